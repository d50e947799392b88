//!
//! The immutable references collector.
//!

use std::collections::BTreeMap;

use crate::ast::AstIndex;
use crate::error::Error;
use crate::sdc::immutable::Immutable;
use crate::sdc::immutable::ImmutableReference;
use crate::solc::standard_json::output::contract::evm::bytecode::Placement;

///
/// Names every immutable placement through the AST of the compilation of `original_file`.
///
pub fn collect(
    immutable_references: &BTreeMap<String, Vec<Placement>>,
    ast_index: &AstIndex,
    original_file: &str,
) -> anyhow::Result<Vec<Immutable>> {
    let mut immutables = Vec::new();
    for (node_id, placements) in immutable_references.iter() {
        let id = node_id.parse::<i64>().map_err(|error| {
            Error::internal(format!(
                "Immutable reference key `{node_id}` in `{original_file}` is not an AST node ID: {error}"
            ))
        })?;
        let name = ast_index
            .node(original_file, id)
            .and_then(|node| node.get("name"))
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| {
                Error::internal(format!(
                    "Immutable reference does not point to a named AST node in `{original_file}`, node ID {node_id}"
                ))
            })?;
        log::debug!("Immutable reference {node_id} is `{name}`");

        immutables.extend(placements.iter().map(|placement| {
            Immutable::from(ImmutableReference::new(
                placement.start,
                placement.length,
                name.to_owned(),
            ))
        }));
    }
    Ok(immutables)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::ast::AstIndex;
    use crate::sdc::immutable::Immutable;
    use crate::solc::standard_json::output::contract::evm::bytecode::Placement;
    use crate::solc::standard_json::output::source::Source;

    fn index() -> AstIndex {
        let ast = serde_json::json!({
            "id": 1,
            "nodes": [
                { "id": 7, "nodeType": "VariableDeclaration", "name": "OWNER" },
                { "id": 8, "nodeType": "Block" }
            ]
        });
        let mut sources = BTreeMap::new();
        sources.insert("/work/A.sol".to_owned(), Source { id: 0, ast: Some(ast) });
        let mut index = AstIndex::default();
        index.insert("A.sol", &sources).expect("Always valid");
        index
    }

    #[test]
    fn one_reference_per_placement() {
        let mut references = BTreeMap::new();
        references.insert(
            "7".to_owned(),
            vec![
                Placement { start: 10, length: 32 },
                Placement { start: 90, length: 32 },
            ],
        );

        let immutables = super::collect(&references, &index(), "A.sol").expect("Always valid");
        assert_eq!(immutables.len(), 2);
        assert!(immutables.iter().all(|immutable| immutable.varname() == "OWNER"));
        assert!(matches!(&immutables[1], Immutable::Reference(reference) if reference.offset == 90));
    }

    #[test]
    fn unnamed_node_rejected() {
        let mut references = BTreeMap::new();
        references.insert("8".to_owned(), vec![Placement { start: 0, length: 32 }]);
        assert!(super::collect(&references, &index(), "A.sol").is_err());

        let mut references = BTreeMap::new();
        references.insert("404".to_owned(), vec![Placement { start: 0, length: 32 }]);
        assert!(super::collect(&references, &index(), "A.sol").is_err());
    }
}
