//!
//! The SDC build generator.
//!

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use colored::Colorize;
use itertools::Itertools;

use crate::address::chosen::ChosenAddresses;
use crate::address::synthetic::SyntheticAddressIterator;
use crate::ast::AstIndex;
use crate::collector::functions::Location;
use crate::collector::source_list::SourceList;
use crate::error::Error;
use crate::link::LinkResolver;
use crate::options::input_file::InputFile;
use crate::options::Options;
use crate::sdc::contract::ContractInSdc;
use crate::sdc::Sdc;
use crate::solc::standard_json::input::Input as StandardJsonInput;
use crate::solc::standard_json::output::Output as StandardJsonOutput;
use crate::solc::Compiler;

///
/// The SDC build generator.
///
/// Compiles the input files in order, so the SDC indexes and the synthetic addresses only
/// depend on the order of the input files.
///
pub struct BuildGenerator<'a, C>
where
    C: Compiler,
{
    /// The build options.
    options: &'a Options,
    /// The compiler.
    compiler: &'a C,
    /// The AST index of every compilation.
    ast_index: AstIndex,
    /// The address iterator shared by every compilation.
    address_iterator: SyntheticAddressIterator,
    /// The SDCs by key.
    sdcs: BTreeMap<String, Sdc>,
}

impl<'a, C> BuildGenerator<'a, C>
where
    C: Compiler,
{
    /// The standard JSON request artifact extension.
    const STANDARD_JSON_STDIN_EXTENSION: &'static str = "standard.json.stdin";

    /// The standard JSON response artifact extension.
    const STANDARD_JSON_STDOUT_EXTENSION: &'static str = "standard.json.stdout";

    ///
    /// A shortcut constructor.
    ///
    pub fn new(options: &'a Options, compiler: &'a C) -> Self {
        Self {
            options,
            compiler,
            ast_index: AstIndex::default(),
            address_iterator: SyntheticAddressIterator::default(),
            sdcs: BTreeMap::new(),
        }
    }

    ///
    /// Builds the SDCs of every input file, splits off the libraries, and resolves the links.
    ///
    pub fn build(mut self) -> anyhow::Result<BTreeMap<String, Sdc>> {
        let options = self.options;
        for (index, file) in options.files.iter().enumerate() {
            let mut sdc = self.collect_for_file(index, file)?;

            log::debug!("Libraries to add: {:?}", sdc.library_addresses);
            for library_address in sdc.library_addresses.iter() {
                let library_sdc = Self::library_sdc(&sdc, library_address.as_str())?;
                let key = library_sdc.key();
                if self.sdcs.contains_key(key.as_str()) {
                    log::debug!("Library SDC `{key}` is already present, skipping");
                    continue;
                }
                self.sdcs.insert(key, library_sdc);
            }

            sdc.retain_primary();
            let key = sdc.key();
            if self.sdcs.contains_key(key.as_str()) {
                return Err(Error::link(format!(
                    "Two SDCs have the same key `{key}`; check the manual addresses"
                )));
            }
            self.sdcs.insert(key, sdc);
        }

        let resolver = LinkResolver::new(self.options, self.compiler);
        resolver.resolve_links(&mut self.sdcs)?;
        resolver.resolve_struct_links(&mut self.sdcs)?;

        Ok(self.sdcs)
    }

    ///
    /// Compiles the input file and builds its preliminary SDC, which holds every contract of the
    /// compilation closure.
    ///
    fn collect_for_file(&mut self, index: usize, file: &InputFile) -> anyhow::Result<Sdc> {
        let primary_contract = file.contract.as_str();
        let sdc_name = format!("{}_{index}", crate::utils::file_name(file.path.as_str()));
        let output_folder = self.options.output_folder_path();
        let compilation_path = output_folder.join(sdc_name.as_str());
        crate::utils::safe_create_dir(compilation_path.as_path())?;

        let executable = self.options.solc_executable(primary_contract);
        let source_path = self
            .options
            .platform
            .compiler_path(self.options.absolute_file(file).as_str());

        let input = StandardJsonInput::try_from_path(
            source_path.clone(),
            self.options.remappings(),
            self.options.solc_args.as_deref(),
        )?;
        let stdin_path =
            output_folder.join(format!("{sdc_name}.{}", Self::STANDARD_JSON_STDIN_EXTENSION));
        std::fs::write(
            stdin_path.as_path(),
            serde_json::to_vec(&input).expect("Always valid"),
        )
        .map_err(|error| {
            anyhow::anyhow!("File `{}` writing error: {error}", stdin_path.display())
        })?;

        log::debug!("Compiling `{source_path}` with `{executable}`");
        let stdout = self.compiler.standard_json(
            executable.as_str(),
            &input,
            compilation_path.as_path(),
            self.options.allow_paths().as_str(),
        )?;
        let stdout_path =
            output_folder.join(format!("{sdc_name}.{}", Self::STANDARD_JSON_STDOUT_EXTENSION));
        std::fs::write(stdout_path.as_path(), stdout.as_slice()).map_err(|error| {
            anyhow::anyhow!("File `{}` writing error: {error}", stdout_path.display())
        })?;

        let output = StandardJsonOutput::try_from_slice(executable.as_str(), stdout.as_slice())?;
        for warning in output.warnings() {
            eprintln!("{}", warning.to_string().yellow());
        }
        let errors: Vec<String> = output
            .fatal_errors()
            .map(|error| {
                format!(
                    "Got error from {executable} of type {}:\n{}",
                    error.r#type,
                    error
                        .formatted_message
                        .as_deref()
                        .unwrap_or(error.message.as_str())
                )
            })
            .collect();
        if !errors.is_empty() {
            return Err(Error::compilation(errors.join("\n")));
        }

        self.ast_index
            .insert(file.path.as_str(), &output.sources)?;

        let closure = Self::link_reference_closure(&output, source_path.as_str())?;
        let primary_file_contracts = closure
            .first()
            .map(|(_, contracts)| contracts.as_slice())
            .unwrap_or_default();
        if !primary_file_contracts
            .iter()
            .any(|contract| contract == primary_contract)
        {
            return Err(Error::user_input(format!(
                "Contract `{primary_contract}` not found in `{}`; available contracts: [{}]",
                file.path,
                primary_file_contracts.join(", ")
            )));
        }
        log::debug!("Contracts in {sdc_name}: {primary_file_contracts:?}");

        let chosen_addresses = ChosenAddresses::assign(
            closure.iter().flat_map(|(contract_file, contracts)| {
                contracts
                    .iter()
                    .map(move |contract| (contract_file.to_owned(), contract.to_owned()))
            }),
            &mut self.address_iterator,
            &self.options.address,
        );
        log::debug!(
            "Contracts with their chosen addresses: {:?}",
            chosen_addresses.entries()
        );

        let source_list = SourceList::build(
            &output.sources,
            output_folder.as_path(),
            sdc_name.as_str(),
            self.options.fetch_sources,
        )?;

        let mut contracts = Vec::new();
        let mut library_addresses = Vec::new();
        for (contract_file, names) in closure.iter() {
            for name in names.iter() {
                let (contract, addresses) = self.contract_in_sdc(
                    &output,
                    file,
                    contract_file.as_str(),
                    name.as_str(),
                    &chosen_addresses,
                )?;
                library_addresses.extend(addresses);
                contracts.push(contract);
            }
        }

        Ok(Sdc {
            primary_contract: primary_contract.to_owned(),
            primary_contract_address: chosen_addresses
                .get(source_path.as_str(), primary_contract)?
                .to_owned(),
            sdc_origin_file: file.path.clone(),
            original_srclist: source_list.original,
            srclist: source_list.fetched,
            sdc_name,
            contracts,
            library_addresses: library_addresses.into_iter().unique().collect(),
            generated_with: self.options.generated_with.clone(),
            state: BTreeMap::new(),
            struct_linking_info: BTreeMap::new(),
        })
    }

    ///
    /// Builds the contract record, returning it along with the library addresses linked into it.
    ///
    fn contract_in_sdc(
        &self,
        output: &StandardJsonOutput,
        file: &InputFile,
        contract_file: &str,
        name: &str,
        chosen_addresses: &ChosenAddresses,
    ) -> anyhow::Result<(ContractInSdc, Vec<String>)> {
        let contract = output.file_contracts(contract_file)?.get(name).ok_or_else(|| {
            Error::internal(format!(
                "The compiler output has no contract `{name}` in `{contract_file}`"
            ))
        })?;
        let bytecode = &contract.evm.deployed_bytecode;

        let methods = crate::collector::functions::collect(
            contract,
            &self.ast_index,
            Location {
                original_file: file.path.as_str(),
                source_path: contract_file,
                contract_name: name,
            },
        )?;
        log::debug!("Functions of `{name}`: {}", methods.len());

        let linked = crate::linker::link(
            name,
            bytecode.object.as_str(),
            &bytecode.link_references,
            chosen_addresses,
        )?;
        if name == file.contract && linked.bytecode.is_empty() {
            return Err(Error::link(format!(
                "Contract `{name}` has no bytecode - is it abstract?"
            )));
        }

        let immutables = crate::collector::immutables::collect(
            &bytecode.immutable_references,
            &self.ast_index,
            file.path.as_str(),
        )?;
        let varmap = self.options.varmap.then(|| {
            contract
                .local_mappings
                .clone()
                .unwrap_or(serde_json::Value::Null)
        });
        let link_candidates = serde_json::to_value(
            self.options
                .link_candidates
                .get(name)
                .cloned()
                .unwrap_or_default(),
        )
        .expect("Always valid");

        let record = ContractInSdc {
            name: name.to_owned(),
            original_file: file.path.clone(),
            file: contract_file.to_owned(),
            address: chosen_addresses.get(contract_file, name)?.to_owned(),
            methods,
            bytecode: linked.bytecode,
            srcmap: bytecode.source_map.clone().unwrap_or_default(),
            varmap,
            link_candidates,
            storage_layout: contract.storage_layout.clone(),
            immutables,
        };
        Ok((record, linked.library_addresses))
    }

    ///
    /// Returns the source files reachable from `source_path` through the link references, each
    /// with its contracts, in the order of discovery.
    ///
    fn link_reference_closure(
        output: &StandardJsonOutput,
        source_path: &str,
    ) -> anyhow::Result<Vec<(String, Vec<String>)>> {
        let mut closure = Vec::new();
        let mut seen = BTreeSet::from([source_path.to_owned()]);
        let mut work_list = vec![source_path.to_owned()];
        while let Some(contract_file) = work_list.pop() {
            if contract_file == source_path && !output.contracts.contains_key(source_path) {
                closure.push((contract_file, vec![]));
                continue;
            }
            let contracts = output.file_contracts(contract_file.as_str())?;
            for contract in contracts.values() {
                for reference in contract.evm.deployed_bytecode.link_references.keys() {
                    if seen.insert(reference.to_owned()) {
                        work_list.push(reference.to_owned());
                    }
                }
            }
            closure.push((contract_file, contracts.keys().cloned().collect()));
        }
        Ok(closure)
    }

    ///
    /// Builds the standalone SDC of a library linked into the SDC.
    ///
    fn library_sdc(sdc: &Sdc, library_address: &str) -> anyhow::Result<Sdc> {
        let candidates: Vec<&ContractInSdc> = sdc
            .contracts
            .iter()
            .filter(|contract| contract.address == library_address)
            .collect();
        let library = match candidates.as_slice() {
            [library] => *library,
            candidates => {
                return Err(Error::link(format!(
                    "Expected exactly one library at address {library_address}, got [{}]",
                    candidates
                        .iter()
                        .map(|contract| contract.name.as_str())
                        .collect::<Vec<&str>>()
                        .join(", ")
                )))
            }
        };
        log::debug!("Found library contract `{}`", library.name);

        Ok(Sdc {
            primary_contract: library.name.clone(),
            primary_contract_address: library_address.to_owned(),
            sdc_origin_file: sdc.sdc_origin_file.clone(),
            original_srclist: sdc.original_srclist.clone(),
            srclist: sdc.srclist.clone(),
            sdc_name: format!("{}_{}", sdc.sdc_name, library.name),
            contracts: sdc
                .contracts
                .iter()
                .filter(|contract| contract.name == library.name)
                .cloned()
                .collect(),
            library_addresses: vec![],
            generated_with: sdc.generated_with.clone(),
            state: BTreeMap::new(),
            struct_linking_info: BTreeMap::new(),
        })
    }
}
