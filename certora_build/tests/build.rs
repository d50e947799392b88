//!
//! The build manifest tests.
//!

mod common;

use self::common::MockCompiler;
use self::common::Workspace;

#[test]
fn single_contract() {
    let workspace = Workspace::new(&[("A.sol", "contract A { function f() public {} }")]);
    let compiler = MockCompiler::default().with_output("A.sol", |directory| {
        common::single_contract_output(directory, "A.sol", "A")
    });

    let output = workspace.run(&["A.sol"], &compiler).expect("Build failed");

    let key = format!("A_{}", common::FIRST_ADDRESS);
    assert_eq!(output.sdcs.keys().collect::<Vec<_>>(), vec![&key]);
    let sdc = &output.sdcs[&key];
    assert_eq!(sdc.primary_contract, "A");
    assert_eq!(sdc.sdc_name, "A.sol_0");
    assert_eq!(sdc.sdc_origin_file, "A.sol");
    assert!(sdc.library_addresses.is_empty());
    assert!(sdc.state.is_empty());
    assert!(sdc.struct_linking_info.is_empty());

    let contract = &sdc.contracts[0];
    assert_eq!(contract.methods.len(), 1);
    assert_eq!(contract.methods[0].name, "f");
    assert_eq!(contract.methods[0].sighash, "26121ff0");
    assert!(contract.methods[0].notpayable);
    assert_eq!(contract.bytecode, common::BYTECODE);
    assert!(contract.varmap.is_none());

    let manifest = workspace.read_json(".certora_build.json");
    assert_eq!(manifest[&key]["contracts"][0]["methods"][0]["isABI"], true);
    assert_eq!(manifest[&key]["generated_with"], "certora-build A.sol");
    assert!(manifest[&key]["contracts"][0].get("varmap").is_none());
    assert!(workspace.path().join(".certora_config/last_run.conf").is_file());
    assert!(workspace
        .path()
        .join(".certora_config/A.sol_0.standard.json.stdin")
        .is_file());
    assert!(workspace
        .path()
        .join(".certora_config/A.sol_0.standard.json.stdout")
        .is_file());
    assert!(!workspace.path().join(".certora_verify.json").exists());
}

#[test]
fn source_lists() {
    let workspace = Workspace::new(&[("A.sol", "contract A { function f() public {} }")]);
    let compiler = MockCompiler::default().with_output("A.sol", |directory| {
        common::single_contract_output(directory, "A.sol", "A")
    });

    let output = workspace.run(&["A.sol"], &compiler).expect("Build failed");
    let sdc = output.sdcs.values().next().expect("Always exists");
    assert_eq!(
        sdc.original_srclist.keys().collect::<Vec<_>>(),
        sdc.srclist.keys().collect::<Vec<_>>()
    );
    assert_eq!(sdc.srclist[&0usize], "A.sol_0/0_A.sol");
    assert_eq!(
        std::fs::read_to_string(workspace.path().join(".certora_config/A.sol_0/0_A.sol"))
            .expect("Always valid"),
        "contract A { function f() public {} }"
    );

    let output = workspace
        .run(&["A.sol", "--dont_fetch_sources"], &compiler)
        .expect("Build failed");
    let sdc = output.sdcs.values().next().expect("Always exists");
    assert_eq!(sdc.srclist, sdc.original_srclist);
}

#[test]
fn deterministic_manifest() {
    let workspace = Workspace::new(&[
        ("A.sol", "contract A { function f() public {} }"),
        ("B.sol", "contract B { function f() public {} }"),
    ]);
    let compiler = MockCompiler::default()
        .with_output("A.sol", |directory| {
            common::single_contract_output(directory, "A.sol", "A")
        })
        .with_output("B.sol", |directory| {
            common::single_contract_output(directory, "B.sol", "B")
        });

    workspace
        .run(&["A.sol", "B.sol"], &compiler)
        .expect("Build failed");
    let first = std::fs::read(workspace.path().join(".certora_build.json")).expect("Always valid");
    let output = workspace
        .run(&["A.sol", "B.sol"], &compiler)
        .expect("Build failed");
    let second =
        std::fs::read(workspace.path().join(".certora_build.json")).expect("Always valid");
    assert_eq!(first, second);

    let addresses: Vec<&str> = output
        .sdcs
        .values()
        .map(|sdc| sdc.primary_contract_address.as_str())
        .collect();
    assert_eq!(addresses, vec![common::FIRST_ADDRESS, common::SECOND_ADDRESS]);
}

#[test]
fn address_override() {
    let workspace = Workspace::new(&[
        ("A.sol", "contract A { function f() public {} }"),
        ("B.sol", "contract B { function f() public {} }"),
    ]);
    let compiler = MockCompiler::default()
        .with_output("A.sol", |directory| {
            common::single_contract_output(directory, "A.sol", "A")
        })
        .with_output("B.sol", |directory| {
            common::single_contract_output(directory, "B.sol", "B")
        });

    let output = workspace
        .run(&["A.sol", "B.sol", "--address", "A:0xABC"], &compiler)
        .expect("Build failed");

    let a = format!("A_{:0>40}", "abc");
    let b = format!("B_{}", common::SECOND_ADDRESS);
    assert_eq!(output.sdcs.keys().collect::<Vec<_>>(), vec![&a, &b]);
    assert_eq!(output.sdcs[&a].contracts[0].address, format!("{:0>40}", "abc"));
}

#[test]
fn address_override_in_shared_file() {
    let workspace = Workspace::new(&[(
        "AB.sol",
        "contract A { function f() public {} } contract B { function f() public {} }",
    )]);
    let compiler = MockCompiler::default().with_output("AB.sol", |directory| {
        let path = format!("{directory}/AB.sol");
        let contract = || {
            common::contract(
                vec![common::abi_function("f", "nonpayable")],
                &[("f()", "26121ff0")],
                common::BYTECODE,
            )
        };
        serde_json::json!({
            "contracts": {
                path.clone(): { "A": contract(), "B": contract() }
            },
            "sources": {
                path: common::source(0, vec![(1, "A", vec![]), (2, "B", vec![])])
            }
        })
    });

    let output = workspace
        .run(&["AB.sol:A", "AB.sol:B", "--address", "A:0xABC"], &compiler)
        .expect("Build failed");

    let a = format!("A_{:0>40}", "abc");
    let b = format!("B_{}", common::FOURTH_ADDRESS);
    assert_eq!(output.sdcs.keys().collect::<Vec<_>>(), vec![&a, &b]);
    assert_eq!(output.sdcs[&a].sdc_name, "AB.sol_0");
    assert_eq!(output.sdcs[&a].contracts.len(), 1);
    assert_eq!(output.sdcs[&b].sdc_name, "AB.sol_1");
    assert_eq!(output.sdcs[&b].contracts[0].address, common::FOURTH_ADDRESS);
}

#[test]
fn payable_flag_overridden_by_mutability() {
    let workspace = Workspace::new(&[("A.sol", "contract A { function f() public {} }")]);
    let compiler = MockCompiler::default().with_output("A.sol", |directory| {
        let path = format!("{directory}/A.sol");
        let mut f = common::abi_function("f", "nonpayable");
        f["payable"] = serde_json::json!(true);
        serde_json::json!({
            "contracts": {
                path.clone(): { "A": common::contract(vec![f], &[("f()", "26121ff0")], common::BYTECODE) }
            },
            "sources": {
                path: common::source(0, vec![(1, "A", vec![])])
            }
        })
    });

    workspace.run(&["A.sol"], &compiler).expect("Build failed");

    let manifest = workspace.read_json(".certora_build.json");
    let method = &manifest[format!("A_{}", common::FIRST_ADDRESS).as_str()]["contracts"][0]["methods"][0];
    assert_eq!(method["notpayable"], true);
    assert_eq!(method["stateMutability"]["keyword"], "nonpayable");
}

#[test]
fn addresses_distinct_across_closures() {
    let workspace = Workspace::new(&[
        ("A.sol", "import './L.sol'; contract A { function f() public { L.g(); } }"),
        ("B.sol", "import './L.sol'; contract B { function f() public { L.g(); } }"),
        ("L.sol", "library L { function g() public {} }"),
    ]);
    let compiler = MockCompiler::default()
        .with_output("A.sol", |directory| library_user_output(directory, "A.sol", "A"))
        .with_output("B.sol", |directory| library_user_output(directory, "B.sol", "B"));

    let output = workspace
        .run(&["A.sol", "B.sol"], &compiler)
        .expect("Build failed");

    let keys: Vec<String> = vec![
        format!("A_{}", common::FIRST_ADDRESS),
        format!("B_{}", common::THIRD_ADDRESS),
        format!("L_{}", common::SECOND_ADDRESS),
        format!("L_{}", common::FOURTH_ADDRESS),
    ];
    assert_eq!(output.sdcs.keys().cloned().collect::<Vec<_>>(), keys);

    let addresses: Vec<&str> = output
        .sdcs
        .values()
        .flat_map(|sdc| sdc.contracts.iter())
        .map(|contract| contract.address.as_str())
        .collect();
    let distinct: std::collections::BTreeSet<&str> = addresses.iter().copied().collect();
    assert_eq!(addresses.len(), 4);
    assert_eq!(distinct.len(), addresses.len());
}

///
/// Returns the output of a file whose contract calls the library `L` of `L.sol`.
///
fn library_user_output(directory: &str, file_name: &str, name: &str) -> serde_json::Value {
    let path = format!("{directory}/{file_name}");
    let l_path = format!("{directory}/L.sol");
    let placeholder = format!("__${}$__", "c".repeat(34));
    let mut user = common::contract(
        vec![common::abi_function("f", "nonpayable")],
        &[("f()", "26121ff0")],
        format!("73{placeholder}00").as_str(),
    );
    user["evm"]["deployedBytecode"]["linkReferences"] = serde_json::json!({
        l_path.clone(): { "L": [{ "start": 1, "length": 20 }] }
    });
    let l = common::contract(
        vec![common::abi_function("g", "view")],
        &[("g()", "e2179b8e")],
        common::BYTECODE,
    );
    serde_json::json!({
        "contracts": {
            path.clone(): { name: user },
            l_path.clone(): { "L": l }
        },
        "sources": {
            path: common::source(0, vec![(1, name, vec![])]),
            l_path: common::source(1, vec![(2, "L", vec![])])
        }
    })
}

#[test]
fn library_linking() {
    let workspace = Workspace::new(&[
        ("A.sol", "import './L.sol'; contract A { function f() public { L.g(); } }"),
        ("L.sol", "library L { function g() public {} }"),
    ]);
    let placeholder = format!("__${}$__", "a".repeat(34));
    let compiler = MockCompiler::default().with_output("A.sol", move |directory| {
        let a_path = format!("{directory}/A.sol");
        let l_path = format!("{directory}/L.sol");
        let mut a = common::contract(
            vec![common::abi_function("f", "nonpayable")],
            &[("f()", "26121ff0")],
            format!("73{placeholder}00").as_str(),
        );
        a["evm"]["deployedBytecode"]["linkReferences"] = serde_json::json!({
            l_path.clone(): { "L": [{ "start": 1, "length": 20 }] }
        });
        let l = common::contract(
            vec![common::abi_function("g", "view")],
            &[("g()", "e2179b8e")],
            common::BYTECODE,
        );
        serde_json::json!({
            "contracts": {
                a_path.clone(): { "A": a },
                l_path.clone(): { "L": l }
            },
            "sources": {
                a_path: common::source(0, vec![(1, "A", vec![])]),
                l_path: common::source(1, vec![(2, "L", vec![])])
            }
        })
    });

    let output = workspace.run(&["A.sol"], &compiler).expect("Build failed");

    let a_key = format!("A_{}", common::FIRST_ADDRESS);
    let l_key = format!("L_{}", common::SECOND_ADDRESS);
    assert_eq!(output.sdcs.keys().collect::<Vec<_>>(), vec![&a_key, &l_key]);

    let a = &output.sdcs[&a_key];
    assert_eq!(a.contracts.len(), 1);
    assert_eq!(a.library_addresses, vec![common::SECOND_ADDRESS.to_owned()]);
    assert_eq!(
        a.contracts[0].bytecode,
        format!("73{}00", common::SECOND_ADDRESS)
    );
    assert!(!a.contracts[0].bytecode.contains("__$"));

    let l = &output.sdcs[&l_key];
    assert_eq!(l.sdc_name, "A.sol_0_L");
    assert_eq!(l.sdc_origin_file, "A.sol");
    assert_eq!(l.contracts.len(), 1);
    assert_eq!(l.contracts[0].methods[0].sighash, "e2179b8e");
    assert!(l.contracts[0].methods[0].notpayable);
    assert_eq!(l.srclist, a.srclist);
}

#[test]
fn missing_library_address() {
    let workspace = Workspace::new(&[("A.sol", "contract A {}")]);
    let placeholder = format!("__${}$__", "b".repeat(34));
    let compiler = MockCompiler::default().with_output("A.sol", move |directory| {
        let path = format!("{directory}/A.sol");
        let mut a = common::contract(vec![], &[], format!("73{placeholder}").as_str());
        a["evm"]["deployedBytecode"]["linkReferences"] = serde_json::json!({
            path.clone(): { "Missing": [{ "start": 1, "length": 20 }] }
        });
        serde_json::json!({
            "contracts": { path.clone(): { "A": a } },
            "sources": { path: common::source(0, vec![(1, "A", vec![])]) }
        })
    });

    let error = workspace.run(&["A.sol"], &compiler).expect_err("Must fail");
    assert!(matches!(
        error.downcast_ref::<certora_build::Error>(),
        Some(certora_build::Error::Link(_))
    ));
}

#[test]
fn abstract_primary() {
    let workspace = Workspace::new(&[("A.sol", "abstract contract A {}")]);
    let compiler = MockCompiler::default().with_output("A.sol", |directory| {
        let path = format!("{directory}/A.sol");
        serde_json::json!({
            "contracts": { path.clone(): { "A": common::contract(vec![], &[], "") } },
            "sources": { path: common::source(0, vec![(1, "A", vec![])]) }
        })
    });

    let error = workspace.run(&["A.sol"], &compiler).expect_err("Must fail");
    assert!(matches!(
        error.downcast_ref::<certora_build::Error>(),
        Some(certora_build::Error::Link(_))
    ));
}

#[test]
fn compilation_error() {
    let workspace = Workspace::new(&[("A.sol", "contract A {")]);
    let compiler = MockCompiler::default().with_output("A.sol", |_| {
        serde_json::json!({
            "errors": [{
                "severity": "error",
                "type": "ParserError",
                "message": "Expected '}'",
                "formattedMessage": "ParserError: Expected '}'"
            }]
        })
    });

    let error = workspace.run(&["A.sol"], &compiler).expect_err("Must fail");
    assert!(matches!(
        error.downcast_ref::<certora_build::Error>(),
        Some(certora_build::Error::Compilation(_))
    ));
    assert!(error.to_string().contains("of type ParserError"));
}

#[test]
fn unknown_primary() {
    let workspace = Workspace::new(&[("A.sol", "contract A {}")]);
    let compiler = MockCompiler::default().with_output("A.sol", |directory| {
        common::single_contract_output(directory, "A.sol", "A")
    });

    let error = workspace
        .run(&["A.sol:Token"], &compiler)
        .expect_err("Must fail");
    assert!(matches!(
        error.downcast_ref::<certora_build::Error>(),
        Some(certora_build::Error::UserInput(_))
    ));
}

#[test]
fn duplicate_key() {
    let workspace = Workspace::new(&[("A.sol", "contract A {}"), ("A2.sol", "contract A {}")]);
    let compiler = MockCompiler::default()
        .with_output("A.sol", |directory| {
            common::single_contract_output(directory, "A.sol", "A")
        })
        .with_output("A2.sol", |directory| {
            common::single_contract_output(directory, "A2.sol", "A")
        });

    let error = workspace
        .run(&["A.sol", "A2.sol:A", "--address", "A:1"], &compiler)
        .expect_err("Must fail");
    assert!(matches!(
        error.downcast_ref::<certora_build::Error>(),
        Some(certora_build::Error::Link(_))
    ));
}

#[test]
fn varmap_and_link_candidates() {
    let workspace = Workspace::new(&[("A.sol", "contract A {}")]);
    let compiler = MockCompiler::default().with_output("A.sol", |directory| {
        common::single_contract_output(directory, "A.sol", "A")
    });

    let output = workspace
        .run(
            &["A.sol", "--varmap", "--link_candidates", "A:token=T"],
            &compiler,
        )
        .expect("Build failed");
    let contract = &output.sdcs.values().next().expect("Always exists").contracts[0];
    assert_eq!(contract.varmap, Some(serde_json::Value::Null));
    assert_eq!(contract.link_candidates, serde_json::json!({ "token": "T" }));
}
