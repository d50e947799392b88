//!
//! The build driver utils.
//!

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use sha3::Digest;

use crate::error::Error;

/// The length of an address rendered as hexadecimal digits.
pub const ADDRESS_HEX_LENGTH: usize = 40;

///
/// Returns a `keccak256` selector of the specified contract method.
///
pub fn selector(signature: &str) -> [u8; 4] {
    let hash_bytes = sha3::Keccak256::digest(signature.as_bytes());
    hash_bytes[0..4].try_into().expect("Always valid")
}

///
/// Returns the `keccak256` selector of the method as 8 lowercase hexadecimal digits.
///
pub fn selector_hex(signature: &str) -> String {
    hex::encode(selector(signature))
}

///
/// Normalizes `path` by replacing possible backslashes with ordinary slashes, and returns a string.
///
pub fn path_to_string_normalized(path: &Path) -> String {
    path.to_string_lossy()
        .replace(std::path::MAIN_SEPARATOR_STR, "/")
}

///
/// Makes `path` absolute against `base` and removes `.` and `..` components lexically.
///
/// The file system is not touched, so the path does not have to exist.
///
pub fn absolute_path(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            component => normalized.push(component.as_os_str()),
        }
    }
    normalized
}

///
/// Returns the file name without its last extension.
///
pub fn file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default()
}

///
/// Returns the last extension of the file, or an empty string.
///
pub fn file_extension(path: &str) -> String {
    Path::new(path)
        .extension()
        .map(|extension| extension.to_string_lossy().to_string())
        .unwrap_or_default()
}

///
/// Returns the last component of a slash-separated path.
///
pub fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

///
/// Removes the directory with its contents if it exists, and creates it anew.
///
pub fn remove_and_recreate_dir(path: &Path) -> anyhow::Result<()> {
    if path.is_dir() {
        std::fs::remove_dir_all(path).map_err(|error| {
            anyhow::anyhow!("Directory `{}` removal error: {error}", path.display())
        })?;
    }
    std::fs::create_dir_all(path)
        .map_err(|error| anyhow::anyhow!("Directory `{}` creation error: {error}", path.display()))
}

///
/// Creates the directory if it does not exist yet.
///
pub fn safe_create_dir(path: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(path)
        .map_err(|error| anyhow::anyhow!("Directory `{}` creation error: {error}", path.display()))
}

///
/// Writes `value` as JSON with sorted keys and four-space indentation.
///
pub fn write_json_sorted<T>(path: &Path, value: &T) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    use serde::Serialize;

    // `serde_json::Map` keeps its keys ordered, so a round trip through `Value` sorts them.
    let value = serde_json::to_value(value)?;
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    std::fs::write(path, buffer)
        .map_err(|error| anyhow::anyhow!("File `{}` writing error: {error}", path.display()))
}

///
/// Whether the string is a non-empty hexadecimal number, with an optional `0x` prefix.
///
pub fn is_hex(value: &str) -> bool {
    let digits = strip_hex_prefix(value);
    !digits.is_empty() && digits.chars().all(|character| character.is_ascii_hexdigit())
}

///
/// Strips the `0x` or `0X` prefix if present.
///
pub fn strip_hex_prefix(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

///
/// Renders a hexadecimal number as lowercase digits without a prefix and leading zeros.
///
pub fn normalize_hex_number(value: &str) -> anyhow::Result<String> {
    if !is_hex(value) {
        return Err(Error::user_input(format!(
            "`{value}` is not a hexadecimal number"
        )));
    }
    let digits = strip_hex_prefix(value)
        .trim_start_matches('0')
        .to_ascii_lowercase();
    if digits.is_empty() {
        Ok("0".to_owned())
    } else {
        Ok(digits)
    }
}

///
/// Renders a hexadecimal address as exactly 40 lowercase digits without a prefix.
///
pub fn normalize_address(value: &str) -> anyhow::Result<String> {
    if !is_hex(value) {
        return Err(Error::user_input(format!(
            "`{value}` is not a hexadecimal address"
        )));
    }
    let digits = strip_hex_prefix(value).to_ascii_lowercase();
    let significant = digits.trim_start_matches('0');
    if significant.len() > ADDRESS_HEX_LENGTH {
        return Err(Error::user_input(format!(
            "`{value}` does not fit into 160 bits"
        )));
    }
    Ok(format!(
        "{:0>width$}",
        significant,
        width = ADDRESS_HEX_LENGTH
    ))
}
