//! Units shared by every binding: the deployment lookup helper, the code hash
//! resolver and the index.
use super::{script::SCRIPTS_UNIT, CLI_PACKAGE, WEB3_PACKAGE};
use crate::decl::{
    Arrow, ArrowBody, BinOp, Expr, Function, Import, Item, Param, PropertySig, SourceUnit, Stmt,
    TsType, VarKind, Variable,
};

pub const UTILS_UNIT: &str = "utils";
pub const CONTRACTS_UNIT: &str = "contracts";
pub const INDEX_UNIT: &str = "index";

fn ret_undefined_if_missing(name: &str) -> Stmt {
    Stmt::if_then(
        Expr::ident(name).strict_eq(Expr::Undefined),
        vec![Stmt::Return(Expr::Undefined)],
    )
}

/// The `utils` unit with `loadContractInstanceFromDeployments`, used by every
/// instance's `in` resolver.
pub fn generate_utils() -> SourceUnit {
    let deployments = TsType::Array(Box::new(TsType::Object(vec![
        PropertySig::new("deployerAddress", TsType::named("string")),
        PropertySig::new(
            "contracts",
            TsType::generic(
                "Record",
                vec![
                    TsType::named("string"),
                    TsType::named("DeployContractExecutionResult"),
                ],
            ),
        ),
    ])));
    let in_group = Expr::arrow(Arrow {
        is_async: false,
        params: vec![Param::untyped("d")],
        ret: None,
        body: ArrowBody::Expr(
            Expr::call("groupOfAddress", vec![Expr::ident("d.deployerAddress")])
                .strict_eq(Expr::ident("group")),
        ),
    });
    let select_deployer = Expr::cond(
        Expr::ident("group").strict_eq(Expr::Undefined),
        Expr::ident("allDeployments").index(Expr::Number(0)),
        Expr::ident("allDeployments").method_call("find", vec![in_group]),
    );
    let task_variable = Expr::ident("taskId").method_call(
        "replace",
        vec![Expr::ident(r"/[:\-]/g"), Expr::str("_")],
    );
    let select_contract = Expr::cond(
        Expr::ident("taskId").strict_eq(Expr::Undefined),
        Expr::ident("deployments.contracts").index(Expr::ident("contractName")),
        Expr::ident("deployments.contracts").index(task_variable),
    );
    let body = vec![
        Stmt::Variable(Variable::constant("deployments", select_deployer)),
        ret_undefined_if_missing("deployments"),
        Stmt::Variable(Variable::constant("result", select_contract)),
        ret_undefined_if_missing("result"),
        Stmt::Return(Expr::ident("result.contractInstance").cast(TsType::named("T"))),
    ];

    let mut unit = SourceUnit::new(UTILS_UNIT);
    unit.push(Import::named(["ContractInstance", "groupOfAddress"], WEB3_PACKAGE));
    unit.push(Import::named(["DeployContractExecutionResult"], CLI_PACKAGE));
    unit.push(Function {
        name: "loadContractInstanceFromDeployments".to_string(),
        exported: true,
        generics: vec!["T extends ContractInstance".to_string()],
        params: vec![
            Param::new("allDeployments", deployments),
            Param::new("contractName", TsType::named("string")),
            Param::optional("group", TsType::named("number")),
            Param::optional("taskId", TsType::named("string")),
        ],
        ret: Some(TsType::Union(vec![
            TsType::named("T"),
            TsType::named("undefined"),
        ])),
        body,
    });
    unit
}

/// The `contracts` unit resolving a code hash, release or debug, to its contract.
pub fn generate_contract_by_code_hash(contract_names: &[String]) -> SourceUnit {
    let matches_hash = |field: &str| {
        Expr::ident(format!("c.contract.{field}")).strict_eq(Expr::ident("codeHash"))
    };
    let find = Expr::arrow(Arrow {
        is_async: false,
        params: vec![Param::untyped("c")],
        ret: None,
        body: ArrowBody::Expr(
            matches_hash("codeHash").binary(BinOp::Or, matches_hash("codeHashDebug")),
        ),
    });
    let contracts = Expr::Array(contract_names.iter().map(Expr::ident).collect());
    let unknown = Expr::new_instance(
        "Error",
        vec![Expr::str("Unknown code with code hash: ")
            .binary(BinOp::Add, Expr::ident("codeHash"))],
    );

    let mut unit = SourceUnit::new(CONTRACTS_UNIT);
    unit.push(Import::named(["Contract", "ContractFactory"], WEB3_PACKAGE));
    if !contract_names.is_empty() {
        unit.push(Import::named(contract_names, "."));
    }
    unit.push(Variable {
        name: "contracts".to_string(),
        exported: false,
        kind: VarKind::Let,
        ty: Some(TsType::Union(vec![
            TsType::Array(Box::new(TsType::generic(
                "ContractFactory",
                vec![TsType::named("any")],
            ))),
            TsType::named("undefined"),
        ])),
        value: Expr::Undefined,
    });
    unit.push(Function {
        name: "getContractByCodeHash".to_string(),
        exported: true,
        generics: vec![],
        params: vec![Param::new("codeHash", TsType::named("string"))],
        ret: Some(TsType::named("Contract")),
        body: vec![
            Stmt::if_then(
                Expr::ident("contracts").strict_eq(Expr::Undefined),
                vec![Stmt::Expr(
                    Expr::ident("contracts").binary(BinOp::Assign, contracts),
                )],
            ),
            Stmt::Variable(Variable::constant(
                "c",
                Expr::ident("contracts").method_call("find", vec![find]),
            )),
            Stmt::if_then(
                Expr::ident("c").strict_eq(Expr::Undefined),
                vec![Stmt::Throw(unknown)],
            ),
            Stmt::Return(Expr::ident("c.contract")),
        ],
    });
    unit
}

/// The `index` unit re-exporting every contract unit, sorted by name, then the scripts.
pub fn generate_index(contract_names: &[String]) -> SourceUnit {
    let mut names = contract_names.to_vec();
    names.sort();
    let mut unit = SourceUnit::new(INDEX_UNIT);
    for name in names {
        unit.push(Item::ReExport(format!("./{name}")));
    }
    unit.push(Item::ReExport(format!("./{SCRIPTS_UNIT}")));
    unit
}
