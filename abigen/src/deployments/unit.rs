//! The `deployments` unit: the merged `Deployments` type and `loadDeployments`.
use super::{loader::DeploymentLoader, merge::DeploymentSchema};
use crate::{
    decl::{
        Arrow, ArrowBody, BinOp, Expr, Function, Import, ObjectEntry, Param, PropertySig,
        SourceUnit, Stmt, TsType, TypeAlias, Variable,
    },
    gen::{instance_name, CLI_PACKAGE, WEB3_PACKAGE},
};
use abigen_error::LoadError;
use abigen_tracing::println_warning;
use abigen_types::{
    deployment::{task_id_to_variable, type_from_task_id},
    NetworkId,
};
use anyhow::{Context, Result};
use indexmap::IndexSet;
use itertools::Itertools;
use std::path::{Component, Path, PathBuf};

pub const DEPLOYMENTS_UNIT: &str = "deployments";

/// Where the unit imports a network's manifest from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestImport {
    pub network: NetworkId,
    /// Import specifier relative to the output directory.
    pub path: String,
}

impl ManifestImport {
    fn binding(&self) -> String {
        format!("{}Deployments", self.network)
    }
}

/// Computes the import of every manifest the loader holds, relative to `out_dir`.
pub fn manifest_imports(loader: &DeploymentLoader, out_dir: &Path) -> Result<Vec<ManifestImport>> {
    let out_dir = out_dir
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", out_dir.display()))?;
    loader
        .networks()
        .iter()
        .map(|deployments| {
            let manifest = deployments
                .path
                .canonicalize()
                .with_context(|| format!("failed to resolve {}", deployments.path.display()))?;
            Ok(ManifestImport {
                network: deployments.network,
                path: import_specifier(&relative_path(&out_dir, &manifest)),
            })
        })
        .collect()
}

/// The path leading from directory `from` to `to`. Both must be absolute.
fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from = from.components().collect::<Vec<_>>();
    let to = to.components().collect::<Vec<_>>();
    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();
    let mut path = PathBuf::new();
    for _ in &from[common..] {
        path.push(Component::ParentDir);
    }
    for component in &to[common..] {
        path.push(component);
    }
    path
}

fn import_specifier(path: &Path) -> String {
    let path = path
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .join("/");
    if path.starts_with("..") {
        path
    } else {
        format!("./{path}")
    }
}

/// Generates the deployments unit from the merged schema of every manifest.
///
/// Deployed contracts whose type is not among the generated `contracts` are left out.
pub fn generate_deployments(
    loader: &DeploymentLoader,
    imports: &[ManifestImport],
    contracts: &[String],
) -> SourceUnit {
    let mut schema = loader.schema();
    let unbound = schema
        .contracts
        .retain(|task_id| contracts.iter().any(|name| name == type_from_task_id(task_id)));
    for task_id in &unbound {
        println_warning(&format!(
            "skipping deployed contract `{task_id}`: no binding was generated for {}",
            type_from_task_id(task_id)
        ));
    }
    let contract_types = schema
        .contracts
        .all()
        .map(type_from_task_id)
        .collect::<IndexSet<_>>();

    let mut unit = SourceUnit::new(DEPLOYMENTS_UNIT);
    unit.push(Import::named(
        ["RunScriptResult", "DeployContractExecutionResult"],
        CLI_PACKAGE,
    ));
    unit.push(Import::named(["NetworkId"], WEB3_PACKAGE));
    if !contract_types.is_empty() {
        let names = contract_types
            .iter()
            .flat_map(|name| [name.to_string(), instance_name(name)]);
        unit.push(Import::named(names, "."));
    }
    for import in imports {
        unit.push(Import::default_as(import.binding(), &import.path));
    }
    unit.push(deployments_type(&schema));
    unit.push(to_deployments(&schema));
    unit.push(load_deployments(imports));
    unit
}

fn contract_field(task_id: &str, optional: bool) -> PropertySig {
    let ty = TsType::generic(
        "DeployContractExecutionResult",
        vec![TsType::named(instance_name(type_from_task_id(task_id)))],
    );
    PropertySig {
        name: task_id_to_variable(task_id),
        optional,
        ty,
    }
}

fn script_field(task_id: &str, optional: bool) -> PropertySig {
    PropertySig {
        name: task_id_to_variable(task_id),
        optional,
        ty: TsType::named("RunScriptResult"),
    }
}

fn deployments_type(schema: &DeploymentSchema) -> TypeAlias {
    let fields = |ids: &[String], optional: bool, field: fn(&str, bool) -> PropertySig| {
        ids.iter().map(move |id| field(id, optional)).collect::<Vec<_>>()
    };
    let mut contracts = fields(&schema.contracts.required, false, contract_field);
    contracts.extend(fields(&schema.contracts.optional, true, contract_field));
    let mut members = vec![
        PropertySig::new("deployerAddress", TsType::named("string")),
        PropertySig::new("contracts", TsType::Object(contracts)),
    ];
    if schema.has_scripts() {
        let mut scripts = fields(&schema.scripts.required, false, script_field);
        scripts.extend(fields(&schema.scripts.optional, true, script_field));
        members.push(PropertySig::new("scripts", TsType::Object(scripts)));
    }
    TypeAlias::exported("Deployments", TsType::Object(members))
}

fn deployed_contract(task_id: &str) -> Expr {
    let json = Expr::ident("json.contracts").index(Expr::str(task_id));
    let address = json.clone().member("contractInstance").member("address");
    Expr::Object(vec![
        ObjectEntry::Spread(json),
        ObjectEntry::Field(
            "contractInstance".to_string(),
            Expr::ident(type_from_task_id(task_id)).method_call("at", vec![address]),
        ),
    ])
}

/// `toDeployments(json)`: rebuilds a raw manifest record with typed contract instances.
fn to_deployments(schema: &DeploymentSchema) -> Function {
    let required = schema
        .contracts
        .required
        .iter()
        .map(|task_id| (task_id_to_variable(task_id), deployed_contract(task_id)));
    let optional = schema.contracts.optional.iter().map(|task_id| {
        let json = Expr::ident("json.contracts").index(Expr::str(task_id));
        let value = Expr::cond(
            json.strict_eq(Expr::Undefined),
            Expr::Undefined,
            deployed_contract(task_id),
        );
        (task_id_to_variable(task_id), value)
    });
    let mut record = vec![
        ObjectEntry::Spread(Expr::ident("json")),
        ObjectEntry::Field(
            "contracts".to_string(),
            Expr::ident("contracts").cast(TsType::raw(r#"Deployments["contracts"]"#)),
        ),
    ];
    if schema.has_scripts() {
        let scripts = schema.scripts.all().map(|task_id| {
            (
                task_id_to_variable(task_id),
                Expr::ident("json.scripts").index(Expr::str(task_id)),
            )
        });
        record.push(ObjectEntry::Field("scripts".to_string(), Expr::object(scripts)));
    }
    Function {
        name: "toDeployments".to_string(),
        exported: false,
        generics: vec![],
        params: vec![Param::new("json", TsType::named("any"))],
        ret: Some(TsType::named("Deployments")),
        body: vec![
            Stmt::Variable(Variable::constant(
                "contracts",
                Expr::object(required.chain(optional)),
            )),
            Stmt::Return(Expr::Object(record)),
        ],
    }
}

/// Splits a load error's message around the network it names.
fn around_network(error: impl Fn(String) -> LoadError) -> (String, String) {
    const MARKER: &str = "<network>";
    let message = error(MARKER.to_string()).to_string();
    match message.split_once(MARKER) {
        Some((head, tail)) => (head.to_string(), tail.to_string()),
        None => (message, String::new()),
    }
}

fn throw_error(message: Expr) -> Stmt {
    Stmt::Throw(Expr::call("Error", vec![message]))
}

/// `loadDeployments(networkId, deployerAddress?)`, failing as [DeploymentLoader::load] does.
fn load_deployments(imports: &[ManifestImport]) -> Function {
    let network_id = || Expr::ident("networkId");
    let select = imports.iter().rev().fold(Expr::Undefined, |otherwise, import| {
        Expr::cond(
            network_id().strict_eq(Expr::str(import.network.as_str())),
            Expr::ident(import.binding()),
            otherwise,
        )
    });
    let (not_deployed, _) = around_network(|network| LoadError::NetworkNotDeployed { network });
    let (ambiguous_head, ambiguous_tail) =
        around_network(|network| LoadError::AmbiguousDeployer { network });
    let not_found = LoadError::DeploymentNotFound {
        network: String::new(),
        deployer: String::new(),
    }
    .to_string();

    let to_deployments = |record: Expr| Expr::call("toDeployments", vec![record]);
    let find_deployer = Expr::arrow(Arrow {
        is_async: false,
        params: vec![Param::untyped("d")],
        ret: None,
        body: ArrowBody::Expr(
            Expr::ident("d.deployerAddress").strict_eq(Expr::ident("deployerAddress")),
        ),
    });
    let body = vec![
        Stmt::Variable(Variable::constant("deployments", select)),
        Stmt::if_then(
            Expr::ident("deployments").strict_eq(Expr::Undefined),
            vec![throw_error(
                Expr::str(not_deployed.as_str()).binary(BinOp::Add, network_id()),
            )],
        ),
        Stmt::Variable(Variable::constant(
            "allDeployments",
            Expr::cond(
                Expr::call("Array.isArray", vec![Expr::ident("deployments")]),
                Expr::ident("deployments"),
                Expr::Array(vec![Expr::ident("deployments")]),
            ),
        )),
        Stmt::if_then(
            Expr::ident("allDeployments.length").strict_eq(Expr::Number(0)),
            vec![throw_error(
                Expr::str(not_deployed).binary(BinOp::Add, network_id()),
            )],
        ),
        Stmt::if_then(
            Expr::ident("deployerAddress").strict_eq(Expr::Undefined),
            vec![Stmt::If {
                cond: Expr::ident("allDeployments.length").binary(BinOp::Gt, Expr::Number(1)),
                then: vec![throw_error(
                    Expr::str(ambiguous_head)
                        .binary(BinOp::Add, network_id())
                        .binary(BinOp::Add, Expr::str(ambiguous_tail)),
                )],
                otherwise: vec![Stmt::Return(to_deployments(
                    Expr::ident("allDeployments").index(Expr::Number(0)),
                ))],
            }],
        ),
        Stmt::Variable(Variable::constant(
            "result",
            Expr::ident("allDeployments").method_call("find", vec![find_deployer]),
        )),
        Stmt::if_then(
            Expr::ident("result").strict_eq(Expr::Undefined),
            vec![throw_error(Expr::str(not_found))],
        ),
        Stmt::Return(to_deployments(Expr::ident("result"))),
    ];
    Function {
        name: "loadDeployments".to_string(),
        exported: true,
        generics: vec![],
        params: vec![
            Param::new("networkId", TsType::named("NetworkId")),
            Param::optional("deployerAddress", TsType::named("string")),
        ],
        ret: Some(TsType::named("Deployments")),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{typescript::type_inline, Syntax, TypeScript};
    use abigen_types::{
        deployment::ContractInstanceInfo, DeployContractResult, DeploymentsPerAddress,
        NetworkDeployments, RunScriptResult,
    };
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    fn record(deployer: &str, contracts: &[&str], scripts: &[&str]) -> DeploymentsPerAddress {
        DeploymentsPerAddress {
            deployer_address: deployer.to_string(),
            contracts: contracts
                .iter()
                .map(|task_id| {
                    let result = DeployContractResult {
                        tx_id: String::new(),
                        contract_instance: ContractInstanceInfo {
                            address: format!("{task_id}-address"),
                            contract_id: None,
                            group_index: None,
                        },
                        metadata: IndexMap::new(),
                    };
                    (task_id.to_string(), result)
                })
                .collect(),
            scripts: scripts
                .iter()
                .map(|task_id| {
                    let result = RunScriptResult {
                        tx_id: String::new(),
                        metadata: IndexMap::new(),
                    };
                    (task_id.to_string(), result)
                })
                .collect(),
            migrations: IndexMap::new(),
        }
    }

    fn network(network: NetworkId, records: Vec<DeploymentsPerAddress>) -> NetworkDeployments {
        NetworkDeployments {
            network,
            path: PathBuf::from(network.deployment_file_name()),
            records,
        }
    }

    fn imports(networks: &[NetworkId]) -> Vec<ManifestImport> {
        networks
            .iter()
            .map(|network| ManifestImport {
                network: *network,
                path: format!("../../{}", network.deployment_file_name()),
            })
            .collect()
    }

    #[test]
    fn relative_paths_climb_out_of_the_output_dir() {
        let path = relative_path(
            Path::new("/project/artifacts/ts"),
            Path::new("/project/.deployments.testnet.json"),
        );
        assert_eq!(import_specifier(&path), "../../.deployments.testnet.json");
        let path = relative_path(Path::new("/project"), Path::new("/project/a/b.json"));
        assert_eq!(import_specifier(&path), "./a/b.json");
    }

    #[test]
    fn deployments_type_marks_optional_contracts() {
        let loader = DeploymentLoader::new([
            network(NetworkId::Mainnet, vec![record("M", &["Add", "Token:usdt-v2"], &[])]),
            network(NetworkId::Devnet, vec![record("D", &["Add", "Sub"], &["Main"])]),
        ]);
        let manifests = imports(&[NetworkId::Mainnet, NetworkId::Devnet]);
        let contracts = ["Add", "Token", "Sub"].map(String::from);
        let unit = generate_deployments(&loader, &manifests, &contracts);
        let TsType::Object(members) = &unit.type_alias("Deployments").unwrap().ty else {
            panic!("Deployments is not an object type");
        };
        let rendered = members
            .iter()
            .map(|member| format!("{}: {}", member.name, type_inline(&member.ty)))
            .collect::<Vec<_>>();
        assert_eq!(
            rendered,
            vec![
                "deployerAddress: string".to_string(),
                "contracts: { Add: DeployContractExecutionResult<AddInstance>; \
                 Token_usdt_v2?: DeployContractExecutionResult<TokenInstance>; \
                 Sub?: DeployContractExecutionResult<SubInstance> }"
                    .to_string(),
                "scripts: { Main?: RunScriptResult }".to_string(),
            ]
        );
        let names = unit
            .imports()
            .find(|import| import.from == ".")
            .map(|import| import.kind.clone());
        assert_eq!(
            names,
            Some(crate::decl::ImportKind::Named(
                ["Add", "AddInstance", "Token", "TokenInstance", "Sub", "SubInstance"]
                    .map(String::from)
                    .to_vec()
            ))
        );
    }

    #[test]
    fn loader_selects_by_network() {
        let loader = DeploymentLoader::new([network(
            NetworkId::Testnet,
            vec![record("X", &["Add"], &[])],
        )]);
        let rendered = TypeScript::render(&generate_deployments(
            &loader,
            &imports(&[NetworkId::Testnet]),
            &["Add".to_string()],
        ));
        assert!(rendered.contains(
            r#"import { default as testnetDeployments } from "../../.deployments.testnet.json";"#
        ));
        assert!(rendered.contains(
            r#"const deployments = networkId === "testnet" ? testnetDeployments : undefined;"#
        ));
        assert!(rendered.contains(
            r#"throw Error("The contract has not been deployed to the " + networkId);"#
        ));
        assert!(rendered.contains(
            r#""The contract has been deployed multiple times on " +"#
        ));
        assert!(rendered
            .contains(r#"throw Error("The contract deployment result does not exist");"#));
        assert!(!rendered.contains("scripts:"));
    }

    #[test]
    fn empty_manifest_throws_not_deployed() {
        let loader = DeploymentLoader::new([network(NetworkId::Testnet, vec![])]);
        let rendered = TypeScript::render(&generate_deployments(
            &loader,
            &imports(&[NetworkId::Testnet]),
            &[],
        ));
        assert!(rendered.contains(concat!(
            "  if (allDeployments.length === 0) {\n",
            "    throw Error(\"The contract has not been deployed to the \" + networkId);\n",
            "  }\n",
        )));
        assert!(
            rendered.find("allDeployments.length === 0")
                < rendered.find("return toDeployments(allDeployments[0]);")
        );
    }

    #[test]
    fn contracts_without_bindings_are_left_out() {
        let loader = DeploymentLoader::new([network(
            NetworkId::Testnet,
            vec![record("X", &["Add", "Sub", "Sub:v2"], &[])],
        )]);
        let unit = generate_deployments(
            &loader,
            &imports(&[NetworkId::Testnet]),
            &["Add".to_string()],
        );
        let rendered = TypeScript::render(&unit);
        assert!(rendered.contains(r#"import { Add, AddInstance } from ".";"#));
        assert!(rendered.contains("Add: DeployContractExecutionResult<AddInstance>;"));
        assert!(!rendered.contains("Sub"));
    }

    #[test]
    fn error_messages_stay_within_the_line_width() {
        let loader = DeploymentLoader::new([network(
            NetworkId::Testnet,
            vec![record("X", &["Add"], &[])],
        )]);
        let rendered = TypeScript::render(&generate_deployments(
            &loader,
            &imports(&[NetworkId::Testnet]),
            &["Add".to_string()],
        ));
        let long = rendered
            .lines()
            .filter(|line| line.len() > 80 && !line.trim_start().starts_with("import"))
            .collect::<Vec<_>>();
        assert_eq!(long, Vec::<&str>::new());
    }
}
