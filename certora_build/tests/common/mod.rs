//!
//! The build driver test utils.
//!

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::BTreeMap;
use std::path::Path;

use certora_build::solc::standard_json::input::Input as StandardJsonInput;
use certora_build::BuildOutput;
use certora_build::Compiler;

/// The first synthetic address.
pub const FIRST_ADDRESS: &str = "00000000ce4604a0000000000000000000000000";

/// The second synthetic address.
pub const SECOND_ADDRESS: &str = "00000000ce4604a0000000000000000000000001";

/// The third synthetic address.
pub const THIRD_ADDRESS: &str = "00000000ce4604a0000000000000000000000002";

/// The fourth synthetic address.
pub const FOURTH_ADDRESS: &str = "00000000ce4604a0000000000000000000000003";

/// A deployed bytecode without placeholders.
pub const BYTECODE: &str = "6080604052348015600f57600080fd5b50";

///
/// The scripted standard JSON output, called with the directory of the compiled file.
///
type Script = Box<dyn Fn(&str) -> serde_json::Value>;

///
/// The scripted compiler.
///
/// Answers the standard JSON requests by the file name, and writes the assembly listings
/// into the output directory.
///
#[derive(Default)]
pub struct MockCompiler {
    /// The standard JSON outputs by file name.
    outputs: BTreeMap<String, Script>,
    /// The assembly listings by contract name.
    listings: BTreeMap<String, String>,
    /// The number of `--asm` invocations.
    assembly_calls: Cell<usize>,
}

impl MockCompiler {
    ///
    /// Adds the output for the file name.
    ///
    pub fn with_output<F>(mut self, file_name: &str, script: F) -> Self
    where
        F: Fn(&str) -> serde_json::Value + 'static,
    {
        self.outputs.insert(file_name.to_owned(), Box::new(script));
        self
    }

    ///
    /// Adds the assembly listing of the contract.
    ///
    pub fn with_listing(mut self, contract: &str, listing: &str) -> Self {
        self.listings.insert(contract.to_owned(), listing.to_owned());
        self
    }

    ///
    /// Returns the number of `--asm` invocations.
    ///
    pub fn assembly_calls(&self) -> usize {
        self.assembly_calls.get()
    }
}

impl Compiler for MockCompiler {
    fn standard_json(
        &self,
        executable: &str,
        input: &StandardJsonInput,
        output_directory: &Path,
        _allow_paths: &str,
    ) -> anyhow::Result<Vec<u8>> {
        assert!(output_directory.is_dir());
        let source = input
            .sources
            .keys()
            .next()
            .ok_or_else(|| anyhow::anyhow!("{executable}: no sources"))?;
        let (directory, file_name) = source
            .rsplit_once('/')
            .ok_or_else(|| anyhow::anyhow!("{executable}: relative source `{source}`"))?;
        let script = self
            .outputs
            .get(file_name)
            .ok_or_else(|| anyhow::anyhow!("{executable}: unexpected source `{source}`"))?;
        Ok(serde_json::to_vec(&script(directory)).expect("Always valid"))
    }

    fn assembly(
        &self,
        _executable: &str,
        _extra_args: &[String],
        output_directory: &Path,
        _allow_paths: &str,
        _packages: &[String],
        _file: &str,
    ) -> anyhow::Result<()> {
        self.assembly_calls.set(self.assembly_calls.get() + 1);
        for (contract, listing) in self.listings.iter() {
            std::fs::write(output_directory.join(format!("{contract}.evm")), listing)?;
        }
        Ok(())
    }
}

///
/// The temporary working directory.
///
pub struct Workspace {
    /// The directory.
    directory: tempfile::TempDir,
}

impl Workspace {
    ///
    /// Creates the directory with the files.
    ///
    pub fn new(files: &[(&str, &str)]) -> Self {
        let directory = tempfile::tempdir().expect("Always valid");
        for (name, text) in files.iter() {
            std::fs::write(directory.path().join(name), text).expect("Always valid");
        }
        Self { directory }
    }

    ///
    /// Returns the directory path.
    ///
    pub fn path(&self) -> &Path {
        self.directory.path()
    }

    ///
    /// Runs the driver with `args`, the program name excluded.
    ///
    pub fn run(&self, args: &[&str], compiler: &MockCompiler) -> anyhow::Result<BuildOutput> {
        let mut argv = vec!["certora-build"];
        argv.extend_from_slice(args);
        certora_build::run_with_compiler(argv, self.path(), compiler)
    }

    ///
    /// Reads a JSON file of the directory.
    ///
    pub fn read_json(&self, name: &str) -> serde_json::Value {
        let text = std::fs::read_to_string(self.path().join(name)).expect("Always valid");
        serde_json::from_str(text.as_str()).expect("Always valid")
    }
}

///
/// Returns a parameterless ABI function.
///
pub fn abi_function(name: &str, state_mutability: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "function",
        "name": name,
        "inputs": [],
        "outputs": [],
        "stateMutability": state_mutability
    })
}

///
/// Returns a compiled contract.
///
pub fn contract(
    abi: Vec<serde_json::Value>,
    method_identifiers: &[(&str, &str)],
    bytecode: &str,
) -> serde_json::Value {
    let method_identifiers: BTreeMap<&str, &str> = method_identifiers.iter().copied().collect();
    serde_json::json!({
        "abi": abi,
        "evm": {
            "deployedBytecode": {
                "object": bytecode,
                "sourceMap": "0:120:0:-:0",
                "linkReferences": {},
                "immutableReferences": {}
            },
            "methodIdentifiers": method_identifiers
        }
    })
}

///
/// Returns a source entry with an AST of contract definitions, each given as
/// `(id, name, members)`.
///
pub fn source(id: usize, contracts: Vec<(i64, &str, Vec<serde_json::Value>)>) -> serde_json::Value {
    let nodes: Vec<serde_json::Value> = contracts
        .into_iter()
        .map(|(id, name, members)| {
            serde_json::json!({
                "id": id,
                "nodeType": "ContractDefinition",
                "name": name,
                "nodes": members
            })
        })
        .collect();
    serde_json::json!({
        "id": id,
        "ast": {
            "id": 1000 + id,
            "nodeType": "SourceUnit",
            "nodes": nodes
        }
    })
}

///
/// Returns a single-file output with one contract `name` exposing `f()`.
///
pub fn single_contract_output(directory: &str, file_name: &str, name: &str) -> serde_json::Value {
    let path = format!("{directory}/{file_name}");
    serde_json::json!({
        "contracts": {
            path.clone(): {
                name: contract(
                    vec![abi_function("f", "nonpayable")],
                    &[("f()", "26121ff0")],
                    BYTECODE
                )
            }
        },
        "sources": {
            path: source(0, vec![(1, name, vec![])])
        }
    })
}
