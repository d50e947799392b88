//!
//! The compiler source list.
//!

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Error;
use crate::solc::standard_json::output::source::Source;

///
/// The compiler source list.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceList {
    /// The source IDs mapped to the original paths.
    pub original: BTreeMap<usize, String>,
    /// The source IDs mapped to the staged copies, relative to the output folder.
    pub fetched: BTreeMap<usize, String>,
}

impl SourceList {
    ///
    /// Builds the source list, copying each source into `<output_folder>/<sdc_name>/` as
    /// `<id>_<stem>.<extension>` unless `fetch_sources` is unset.
    ///
    pub fn build(
        sources: &BTreeMap<String, Source>,
        output_folder: &Path,
        sdc_name: &str,
        fetch_sources: bool,
    ) -> anyhow::Result<Self> {
        let mut list = Self::default();
        for (path, source) in sources.iter() {
            list.original.insert(source.id, path.to_owned());

            let fetched = if fetch_sources {
                let renamed = format!(
                    "{}_{}.{}",
                    source.id,
                    crate::utils::file_stem(path),
                    crate::utils::file_extension(path)
                );
                let destination = output_folder.join(sdc_name).join(renamed.as_str());
                std::fs::copy(path, &destination).map_err(|error| {
                    Error::user_input(format!(
                        "Source `{path}` copying to `{}` error: {error}",
                        destination.display()
                    ))
                })?;
                format!("{sdc_name}/{renamed}")
            } else {
                path.to_owned()
            };
            list.fetched.insert(source.id, fetched);
        }
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::SourceList;
    use crate::solc::standard_json::output::source::Source;

    #[test]
    fn sources_copied_and_renamed() {
        let directory = tempfile::tempdir().expect("Always valid");
        let source_path = directory.path().join("Token.sol");
        std::fs::write(&source_path, "contract Token {}").expect("Always valid");
        let output_folder = directory.path().join(".certora_config");
        std::fs::create_dir_all(output_folder.join("Token.sol_0")).expect("Always valid");

        let path = crate::utils::path_to_string_normalized(source_path.as_path());
        let mut sources = BTreeMap::new();
        sources.insert(path.clone(), Source { id: 3, ast: None });

        let list = SourceList::build(&sources, output_folder.as_path(), "Token.sol_0", true)
            .expect("Always valid");
        assert_eq!(list.original.get(&3), Some(&path));
        assert_eq!(list.fetched.get(&3).map(String::as_str), Some("Token.sol_0/3_Token.sol"));
        assert!(output_folder.join("Token.sol_0/3_Token.sol").is_file());

        let unfetched = SourceList::build(&sources, output_folder.as_path(), "Token.sol_0", false)
            .expect("Always valid");
        assert_eq!(unfetched.fetched.get(&3), Some(&path));
        assert_eq!(
            unfetched.original.keys().collect::<Vec<_>>(),
            unfetched.fetched.keys().collect::<Vec<_>>()
        );
    }
}
