//!
//! The flattened AST index.
//!

use std::collections::BTreeMap;
use std::collections::VecDeque;

use crate::error::Error;
use crate::solc::standard_json::output::source::Source;

/// The AST nodes of one source file by ID.
pub type SourceNodes = BTreeMap<i64, serde_json::Value>;

///
/// The flattened AST index.
///
/// Keyed by the input file the compilation was started for, then by the compiler source path.
///
#[derive(Debug, Default, Clone)]
pub struct AstIndex {
    /// The indexed compilations.
    files: BTreeMap<String, BTreeMap<String, SourceNodes>>,
}

impl AstIndex {
    /// The function definition node type.
    pub const NODE_TYPE_FUNCTION: &'static str = "FunctionDefinition";

    /// The contract definition node type.
    pub const NODE_TYPE_CONTRACT: &'static str = "ContractDefinition";

    /// The struct definition node type.
    pub const NODE_TYPE_STRUCT: &'static str = "StructDefinition";

    ///
    /// Indexes every source of the compilation of `original_file`.
    ///
    pub fn insert(
        &mut self,
        original_file: &str,
        sources: &BTreeMap<String, Source>,
    ) -> anyhow::Result<()> {
        let mut compilation = BTreeMap::new();
        for (path, source) in sources.iter() {
            let ast = source.ast.as_ref().ok_or_else(|| {
                Error::internal(format!(
                    "The compiler output for `{original_file}` has no AST for source `{path}`"
                ))
            })?;
            log::debug!("Indexing the AST of `{path}` for `{original_file}`");
            compilation.insert(path.to_owned(), Self::flatten(ast));
        }
        self.files.insert(original_file.to_owned(), compilation);
        Ok(())
    }

    ///
    /// Collects every object carrying an integer `id` by breadth-first traversal.
    ///
    pub fn flatten(ast: &serde_json::Value) -> SourceNodes {
        let mut nodes = SourceNodes::new();
        let mut queue = VecDeque::from([ast]);
        while let Some(value) = queue.pop_front() {
            match value {
                serde_json::Value::Object(object) => {
                    if let Some(id) = object.get("id").and_then(serde_json::Value::as_i64) {
                        nodes.entry(id).or_insert_with(|| value.to_owned());
                    }
                    queue.extend(object.values());
                }
                serde_json::Value::Array(array) => queue.extend(array.iter()),
                _ => {}
            }
        }
        nodes
    }

    ///
    /// Returns the nodes of one source of the compilation.
    ///
    pub fn source(&self, original_file: &str, source_path: &str) -> Option<&SourceNodes> {
        self.files.get(original_file)?.get(source_path)
    }

    ///
    /// Looks the node up across every source of the compilation of `original_file`.
    ///
    pub fn node(&self, original_file: &str, id: i64) -> Option<&serde_json::Value> {
        self.files
            .get(original_file)?
            .values()
            .find_map(|nodes| nodes.get(&id))
    }

    ///
    /// Finds the definition of a function that is missing from the ABI.
    ///
    /// The members of `contract_name` are searched first, then the whole source file. A
    /// definition with `parameter_count` parameters is preferred, then the lowest node ID.
    ///
    pub fn function_definition(
        &self,
        original_file: &str,
        source_path: &str,
        contract_name: &str,
        function_name: &str,
        parameter_count: usize,
    ) -> Option<&serde_json::Value> {
        let nodes = self.source(original_file, source_path)?;

        let contract_members: Vec<i64> = nodes
            .values()
            .find(|node| {
                Self::node_type(node) == Some(Self::NODE_TYPE_CONTRACT)
                    && node.get("name").and_then(serde_json::Value::as_str) == Some(contract_name)
            })
            .and_then(|contract| contract.get("nodes"))
            .and_then(serde_json::Value::as_array)
            .map(|members| {
                members
                    .iter()
                    .filter_map(|member| member.get("id").and_then(serde_json::Value::as_i64))
                    .collect()
            })
            .unwrap_or_default();

        let is_candidate = |node: &serde_json::Value| {
            Self::node_type(node) == Some(Self::NODE_TYPE_FUNCTION)
                && node.get("name").and_then(serde_json::Value::as_str) == Some(function_name)
        };
        let member_candidates: Vec<&serde_json::Value> = contract_members
            .iter()
            .filter_map(|id| nodes.get(id))
            .filter(|node| is_candidate(*node))
            .collect();
        let candidates = if member_candidates.is_empty() {
            nodes.values().filter(|node| is_candidate(*node)).collect()
        } else {
            member_candidates
        };
        if candidates.len() > 1 {
            log::debug!(
                "{} definitions of `{function_name}` found in `{source_path}`",
                candidates.len()
            );
        }

        let mut candidates = candidates;
        candidates.sort_by_key(|node| {
            (
                Self::parameter_count(node) != Some(parameter_count),
                node.get("id").and_then(serde_json::Value::as_i64),
            )
        });
        candidates.into_iter().next()
    }

    ///
    /// Returns the `nodeType` of the node.
    ///
    pub fn node_type(node: &serde_json::Value) -> Option<&str> {
        node.get("nodeType").and_then(serde_json::Value::as_str)
    }

    ///
    /// Returns the number of parameters of a function definition.
    ///
    fn parameter_count(node: &serde_json::Value) -> Option<usize> {
        node.get("parameters")?
            .get("parameters")?
            .as_array()
            .map(Vec::len)
    }
}
