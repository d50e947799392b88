//!
//! The contract functions collector.
//!

use crate::ast::AstIndex;
use crate::error::Error;
use crate::sdc::function::Function;
use crate::sdc::function::StateMutability;
use crate::sdc::solidity_type::SolidityType;
use crate::solc::standard_json::output::contract::abi::Entry as AbiEntry;
use crate::solc::standard_json::output::contract::Contract;

/// The user-defined type name node type.
const NODE_TYPE_USER_DEFINED: &str = "UserDefinedTypeName";

/// The enum type string prefix.
const ENUM_PREFIX: &str = "enum ";

/// The type enums are lowered to.
const ENUM_TYPE: &str = "uint8";

/// The storage pointer location.
const STORAGE_LOCATION: &str = "storage";

///
/// The location of the contract being collected.
///
#[derive(Debug, Clone, Copy)]
pub struct Location<'a> {
    /// The input file the compilation was started for.
    pub original_file: &'a str,
    /// The compiler source path of the contract.
    pub source_path: &'a str,
    /// The contract name.
    pub contract_name: &'a str,
}

///
/// Collects the ABI functions, then adds the functions which only have a method identifier.
///
/// The latter are typically internal library functions, recovered from the AST.
///
pub fn collect(
    contract: &Contract,
    ast_index: &AstIndex,
    location: Location,
) -> anyhow::Result<Vec<Function>> {
    let mut functions = contract
        .abi
        .iter()
        .filter(|entry| entry.is_function())
        .map(|entry| from_abi(entry, location))
        .collect::<anyhow::Result<Vec<Function>>>()?;

    for (signature, identifier) in contract.evm.method_identifiers.iter() {
        match functions
            .iter()
            .find(|function| function.signature() == *signature)
        {
            Some(function) => {
                if function.sighash != identifier.to_ascii_lowercase() {
                    return Err(Error::internal(format!(
                        "Function `{signature}` of `{}` has the selector {} computed from the ABI, \
                         but the compiler reports {identifier}",
                        location.contract_name, function.sighash
                    )));
                }
            }
            None => {
                let function = from_ast(signature, identifier, ast_index, location)?;
                log::debug!(
                    "Function `{signature}` of `{}` is not part of the ABI, recovered from the AST",
                    location.contract_name
                );
                functions.push(function);
            }
        }
    }

    Ok(functions)
}

///
/// Builds a function from its ABI entry.
///
fn from_abi(entry: &AbiEntry, location: Location) -> anyhow::Result<Function> {
    let name = entry.name.clone().ok_or_else(|| {
        Error::internal(format!(
            "An unnamed ABI function found in `{}`",
            location.contract_name
        ))
    })?;

    let full_args = entry
        .inputs
        .iter()
        .map(SolidityType::try_from_abi)
        .collect::<anyhow::Result<Vec<SolidityType>>>()?;
    let args = full_args.iter().map(SolidityType::signature).collect();

    let mut returns = Vec::new();
    for output in entry.outputs.as_deref().unwrap_or_default().iter() {
        let r#type = SolidityType::try_from_abi(output)?;
        returns.push(serde_json::to_string(&r#type).expect("Always valid"));
    }

    let state_mutability = entry
        .state_mutability
        .as_deref()
        .map(StateMutability::new)
        .unwrap_or_default();
    let notpayable = entry.payable == Some(false) || state_mutability.is_non_payable();

    let sighash = crate::utils::selector_hex(Function::compute_signature(&name, &full_args).as_str());

    Ok(Function {
        name,
        args,
        full_args,
        returns,
        sighash,
        notpayable,
        is_abi: true,
        state_mutability,
    })
}

///
/// Recovers a function missing from the ABI through its `FunctionDefinition` node.
///
fn from_ast(
    signature: &str,
    identifier: &str,
    ast_index: &AstIndex,
    location: Location,
) -> anyhow::Result<Function> {
    let (name, parameter_count) = split_signature(signature);
    let definition = ast_index
        .function_definition(
            location.original_file,
            location.source_path,
            location.contract_name,
            name,
            parameter_count,
        )
        .ok_or_else(|| {
            Error::internal(format!(
                "Function `{signature}` of `{}` is neither in the ABI nor in the AST of `{}`",
                location.contract_name, location.source_path
            ))
        })?;

    let full_args = parameters(definition, "parameters")
        .iter()
        .map(|parameter| type_from_ast(parameter, ast_index, location.original_file))
        .collect::<anyhow::Result<Vec<SolidityType>>>()?;
    let args = full_args.iter().map(SolidityType::signature).collect();

    let returns = parameters(definition, "returnParameters")
        .iter()
        .map(|parameter| return_description(parameter, signature))
        .collect::<anyhow::Result<Vec<String>>>()?;

    let state_mutability = definition
        .get("stateMutability")
        .and_then(serde_json::Value::as_str)
        .map(StateMutability::new)
        .unwrap_or_default();

    Ok(Function {
        name: name.to_owned(),
        args,
        full_args,
        returns,
        sighash: identifier.to_ascii_lowercase(),
        notpayable: state_mutability.keyword == StateMutability::DEFAULT_KEYWORD,
        is_abi: false,
        state_mutability,
    })
}

///
/// Builds a parameter type from its `VariableDeclaration` node.
///
/// Structs are expanded member by member, and enums are lowered to `uint8`.
///
fn type_from_ast(
    parameter: &serde_json::Value,
    ast_index: &AstIndex,
    original_file: &str,
) -> anyhow::Result<SolidityType> {
    let type_string = parameter
        .get("typeDescriptions")
        .and_then(|descriptions| descriptions.get("typeString"))
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| {
            Error::internal(format!("Parameter without a type description: {parameter}"))
        })?;
    let is_storage = parameter
        .get("storageLocation")
        .and_then(serde_json::Value::as_str)
        == Some(STORAGE_LOCATION);

    let mut components = Vec::new();
    let type_name = parameter.get("typeName");
    if let Some(type_name) =
        type_name.filter(|type_name| AstIndex::node_type(type_name) == Some(NODE_TYPE_USER_DEFINED))
    {
        let reference = type_name
            .get("referencedDeclaration")
            .and_then(serde_json::Value::as_i64)
            .ok_or_else(|| {
                Error::internal(format!("User-defined type `{type_string}` has no declaration"))
            })?;
        let declaration = ast_index.node(original_file, reference).ok_or_else(|| {
            Error::internal(format!(
                "Could not find the AST node {reference} of `{type_string}` in `{original_file}`"
            ))
        })?;
        if AstIndex::node_type(declaration) == Some(AstIndex::NODE_TYPE_STRUCT) {
            for member in declaration
                .get("members")
                .and_then(serde_json::Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default()
                .iter()
            {
                components.push(type_from_ast(member, ast_index, original_file)?);
            }
        }
    }
    let is_struct = !components.is_empty();

    let r#type = if type_string.starts_with(ENUM_PREFIX) {
        ENUM_TYPE.to_owned()
    } else {
        type_string.to_owned()
    };
    SolidityType::new(r#type, components, is_storage, is_struct)
}

///
/// Describes a return parameter by its elementary type name, or its type identifier.
///
fn return_description(parameter: &serde_json::Value, signature: &str) -> anyhow::Result<String> {
    let type_name = parameter.get("typeName");
    type_name
        .and_then(|type_name| type_name.get("name"))
        .or_else(|| {
            type_name
                .and_then(|type_name| type_name.get("typeDescriptions"))
                .and_then(|descriptions| descriptions.get("typeIdentifier"))
        })
        .or_else(|| {
            parameter
                .get("typeDescriptions")
                .and_then(|descriptions| descriptions.get("typeIdentifier"))
        })
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| {
            Error::internal(format!(
                "A return parameter of `{signature}` has no type name: {parameter}"
            ))
        })
}

///
/// Returns `definition.<list>.parameters`, or nothing.
///
fn parameters<'a>(definition: &'a serde_json::Value, list: &str) -> &'a [serde_json::Value] {
    definition
        .get(list)
        .and_then(|list| list.get("parameters"))
        .and_then(serde_json::Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

///
/// Splits `name(type1,type2)` into the name and the number of top-level parameters.
///
fn split_signature(signature: &str) -> (&str, usize) {
    let Some((name, rest)) = signature.split_once('(') else {
        return (signature, 0);
    };
    let arguments = rest.strip_suffix(')').unwrap_or(rest);
    if arguments.is_empty() {
        return (name, 0);
    }

    let mut depth = 0usize;
    let mut count = 1;
    for character in arguments.chars() {
        match character {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => count += 1,
            _ => {}
        }
    }
    (name, count)
}
