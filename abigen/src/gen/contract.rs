//! Bindings of a single contract.
use super::{
    async_arrow, contract_types_name, instance_name, literal, params_or_empty,
    ty::{params_record, record, returns_type},
    CLI_PACKAGE, WEB3_PACKAGE,
};
use crate::decl::{
    Class, ClassMember, Expr, Import, Interface, Item, Method, Namespace, Param, PropertySig,
    SourceUnit, Stmt, TsType, TypeAlias, Variable,
};
use abigen_error::GenerateError;
use abigen_types::{CodeInfo, ContractAbi, EventSig, FunctionSig, ProjectArtifact};

const WEB3_IMPORTS: [&str; 20] = [
    "Address",
    "Contract",
    "ContractState",
    "TestContractResult",
    "HexString",
    "ContractFactory",
    "EventSubscribeOptions",
    "EventSubscription",
    "CallContractParams",
    "CallContractResult",
    "TestContractParams",
    "ContractEvent",
    "subscribeContractEvent",
    "subscribeContractEvents",
    "testMethod",
    "callMethod",
    "multicallMethods",
    "fetchContractState",
    "ContractInstance",
    "getContractEventsCurrentCount",
];

/// Generates the binding unit of `abi`.
///
/// `artifact_path` is the artifact's path relative to the artifact directory, with `/`
/// separators. Fails if the project has no code metadata for the contract.
pub fn generate_contract(
    abi: &ContractAbi,
    project: &ProjectArtifact,
    artifact_path: &str,
) -> Result<SourceUnit, GenerateError> {
    let info = project
        .info(&abi.name)
        .ok_or_else(|| GenerateError::MissingContractMetadata {
            contract: abi.name.clone(),
        })?;
    Ok(ContractBindings::new(abi, info, artifact_path).expand())
}

pub fn event_type_name(event: &EventSig) -> String {
    format!("{}Event", event.name)
}

struct ContractBindings<'a> {
    abi: &'a ContractAbi,
    info: &'a CodeInfo,
    artifact_path: &'a str,
    /// Name of the namespace holding the contract's types.
    types: String,
    instance: String,
}

impl<'a> ContractBindings<'a> {
    fn new(abi: &'a ContractAbi, info: &'a CodeInfo, artifact_path: &'a str) -> Self {
        Self {
            abi,
            info,
            artifact_path,
            types: contract_types_name(&abi.name),
            instance: instance_name(&abi.name),
        }
    }

    fn name(&self) -> &str {
        &self.abi.name
    }

    fn json_name(&self) -> String {
        format!("{}ContractJson", self.name())
    }

    fn scoped(&self, name: &str) -> TsType {
        TsType::named(format!("{}.{name}", self.types))
    }

    fn fields_type(&self) -> TsType {
        if self.abi.has_user_fields() {
            self.scoped("Fields")
        } else {
            TsType::empty_object()
        }
    }

    fn callable(&self) -> Vec<&'a FunctionSig> {
        self.abi.callable_functions().collect()
    }

    fn expand(&self) -> SourceUnit {
        let mut unit = SourceUnit::new(self.name());
        unit.push(Import::named(WEB3_IMPORTS, WEB3_PACKAGE));
        unit.push(Import::named(["DeployContractExecutionResult"], CLI_PACKAGE));
        unit.push(Import::default_as(
            self.json_name(),
            format!("../{}", self.artifact_path),
        ));
        unit.push(Import::named(["getContractByCodeHash"], "./contracts"));
        unit.push(Import::named(["loadContractInstanceFromDeployments"], "./utils"));
        unit.push(Item::Comment("Custom types for the contract".to_string()));
        unit.push(self.types_namespace());
        unit.push(self.factory());
        unit.push(Item::Comment(
            "Use this object to test and deploy the contract".to_string(),
        ));
        unit.push(self.factory_object());
        unit.push(Item::Comment(
            "Use this class to interact with the blockchain".to_string(),
        ));
        unit.push(self.instance_class());
        unit
    }

    fn types_namespace(&self) -> Namespace {
        let mut items: Vec<Item> = Vec::new();
        if self.abi.has_user_fields() {
            let fields = record(self.abi.user_fields().map(|f| (f.name.as_str(), &f.ty)));
            items.push(TypeAlias::exported("Fields", fields).into());
            items.push(
                TypeAlias::exported(
                    "State",
                    TsType::generic("ContractState", vec![TsType::named("Fields")]),
                )
                .into(),
            );
        } else {
            let state = TsType::generic("ContractState", vec![TsType::named("any")]);
            items.push(TypeAlias::exported("State", TsType::omit(state, &["fields"])).into());
        }
        items.extend(self.abi.events.iter().map(|event| Item::from(event_type(event))));
        let callable = self.callable();
        if !callable.is_empty() {
            items.extend(call_method_types(&callable));
        }
        Namespace {
            name: self.types.clone(),
            items,
        }
    }

    fn factory(&self) -> Class {
        let mut members: Vec<ClassMember> = Vec::new();
        if self.abi.has_user_fields() {
            let fields = self.scoped("Fields");
            let defaults = Expr::ident("this.contract")
                .method_call("getInitialFieldsWithDefaultValues", vec![])
                .cast(fields.clone());
            members.push(
                Method::new(
                    "getInitialFieldsWithDefaultValues",
                    vec![],
                    fields,
                    vec![Stmt::Return(defaults)],
                )
                .into(),
            );
        }
        if !self.abi.events.is_empty() {
            let index = self
                .abi
                .events
                .iter()
                .enumerate()
                .map(|(index, event)| (event.name.clone(), Expr::Number(index as i64)));
            members.push(ClassMember::Property {
                name: "eventIndex".to_string(),
                value: Expr::object(index),
            });
        }
        if !self.abi.constants.is_empty() || !self.abi.enums.is_empty() {
            members.push(ClassMember::Property {
                name: "consts".to_string(),
                value: self.consts(),
            });
        }
        members.push(
            Method::new(
                "at",
                vec![Param::new("address", TsType::named("string"))],
                TsType::named(self.instance.clone()),
                vec![Stmt::Return(Expr::new_instance(
                    self.instance.clone(),
                    vec![Expr::ident("address")],
                ))],
            )
            .into(),
        );
        if !self.abi.functions.is_empty() {
            let stubs = self.abi.functions.iter().map(|f| (f.name.clone(), self.test_stub(f)));
            members.push(ClassMember::Property {
                name: "tests".to_string(),
                value: Expr::object(stubs),
            });
        }
        Class {
            name: "Factory".to_string(),
            exported: false,
            extends: Some(TsType::generic(
                "ContractFactory",
                vec![TsType::named(self.instance.clone()), self.fields_type()],
            )),
            members,
        }
    }

    /// Named constants followed by one member table per enum.
    fn consts(&self) -> Expr {
        let constants = self
            .abi
            .constants
            .iter()
            .map(|constant| (constant.name.clone(), literal::encode(&constant.value)));
        let enums = self.abi.enums.iter().map(|def| {
            let members = def
                .fields
                .iter()
                .map(|field| (field.name.clone(), literal::encode(&field.value)));
            (def.name.clone(), Expr::object(members))
        });
        Expr::object(constants.chain(enums))
    }

    fn test_stub(&self, function: &FunctionSig) -> Expr {
        let has_args = function.has_params();
        let has_fields = self.abi.has_user_fields();
        let never = || TsType::named("never");
        let fields = if has_fields { self.scoped("Fields") } else { never() };
        let args = if has_args {
            params_record(&function.params)
        } else {
            never()
        };
        let params = TsType::generic("TestContractParams", vec![fields, args]);
        let param = match (has_args, has_fields) {
            (true, true) => Param::new("params", params),
            (true, false) => Param::new("params", TsType::omit(params, &["initialFields"])),
            (false, true) => Param::new("params", TsType::omit(params, &["testArgs"])),
            (false, false) => Param::optional(
                "params",
                TsType::omit(params, &["testArgs", "initialFields"]),
            ),
        };
        let call_params = if param.optional {
            params_or_empty()
        } else {
            Expr::ident("params")
        };
        let ret = TsType::promise(TsType::generic(
            "TestContractResult",
            vec![returns_type(&function.returns)],
        ));
        let call = Expr::call(
            "testMethod",
            vec![Expr::ident("this"), Expr::str(&function.name), call_params],
        );
        async_arrow(vec![param], ret, vec![Stmt::Return(call)])
    }

    fn factory_object(&self) -> Variable {
        let contract = Expr::call(
            "Contract.fromJson",
            vec![
                Expr::ident(self.json_name()),
                Expr::str(&self.info.bytecode_debug_patch),
                Expr::str(&self.info.code_hash_debug),
            ],
        );
        Variable::constant(self.name(), Expr::new_instance("Factory", vec![contract])).exported()
    }

    fn instance_class(&self) -> Class {
        let mut members = vec![
            ClassMember::Constructor {
                params: vec![Param::new("address", TsType::named("Address"))],
                body: vec![Stmt::Expr(Expr::call("super", vec![Expr::ident("address")]))],
            },
            self.in_resolver().into(),
            Method::new(
                "fetchState",
                vec![],
                TsType::promise(self.scoped("State")),
                vec![Stmt::Return(Expr::call(
                    "fetchContractState",
                    vec![Expr::ident(self.name()), Expr::ident("this")],
                ))],
            )
            .asynchronous()
            .into(),
        ];
        if !self.abi.events.is_empty() {
            members.push(
                Method::new(
                    "getContractEventsCurrentCount",
                    vec![],
                    TsType::promise(TsType::named("number")),
                    vec![Stmt::Return(Expr::call(
                        "getContractEventsCurrentCount",
                        vec![Expr::ident("this.address")],
                    ))],
                )
                .asynchronous()
                .into(),
            );
        }
        members.extend(
            self.abi
                .events
                .iter()
                .map(|event| ClassMember::from(self.subscribe_event(event))),
        );
        if self.abi.events.len() > 1 {
            members.push(self.subscribe_all_events().into());
        }
        let callable = self.callable();
        if !callable.is_empty() {
            let stubs = callable.iter().map(|f| (f.name.clone(), self.call_stub(f)));
            members.push(ClassMember::Property {
                name: "methods".to_string(),
                value: Expr::object(stubs),
            });
            members.push(self.multicall().into());
        }
        Class {
            name: self.instance.clone(),
            exported: true,
            extends: Some(TsType::named("ContractInstance")),
            members,
        }
    }

    /// `static in(...)`: picks this contract's instance out of loaded deployments.
    fn in_resolver(&self) -> Method {
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
        let load = Expr::call_generic(
            "loadContractInstanceFromDeployments",
            vec![TsType::named(self.instance.clone())],
            vec![
                Expr::ident("allDeployments"),
                Expr::str(self.name()),
                Expr::ident("group"),
                Expr::ident("taskId"),
            ],
        );
        Method {
            name: "in".to_string(),
            is_static: true,
            is_async: false,
            generics: vec![],
            params: vec![
                Param::new("allDeployments", deployments),
                Param::optional("group", TsType::named("number")),
                Param::optional("taskId", TsType::named("string")),
            ],
            ret: Some(TsType::Union(vec![
                TsType::named(self.instance.clone()),
                TsType::named("undefined"),
            ])),
            body: vec![Stmt::Return(load)],
        }
    }

    fn subscribe_event(&self, event: &EventSig) -> Method {
        let event_type = event_type_name(event);
        let options = TsType::generic("EventSubscribeOptions", vec![self.scoped(&event_type)]);
        let subscribe = Expr::call(
            "subscribeContractEvent",
            vec![
                Expr::ident(format!("{}.contract", self.name())),
                Expr::ident("this"),
                Expr::ident("options"),
                Expr::str(&event.name),
                Expr::ident("fromCount"),
            ],
        );
        Method::new(
            format!("subscribe{event_type}"),
            subscription_params(options),
            TsType::named("EventSubscription"),
            vec![Stmt::Return(subscribe)],
        )
    }

    fn subscribe_all_events(&self) -> Method {
        let events = self
            .abi
            .events
            .iter()
            .map(|event| self.scoped(&event_type_name(event)))
            .collect();
        let options = TsType::generic("EventSubscribeOptions", vec![TsType::Union(events)]);
        let subscribe = Expr::call(
            "subscribeContractEvents",
            vec![
                Expr::ident(format!("{}.contract", self.name())),
                Expr::ident("this"),
                Expr::ident("options"),
                Expr::ident("fromCount"),
            ],
        );
        Method::new(
            "subscribeAllEvents",
            subscription_params(options),
            TsType::named("EventSubscription"),
            vec![Stmt::Return(subscribe)],
        )
    }

    fn call_stub(&self, function: &FunctionSig) -> Expr {
        let name = TsType::StrLit(function.name.clone());
        let params = TsType::generic(
            format!("{}.CallMethodParams", self.types),
            vec![name.clone()],
        );
        let (param, call_params) = if function.has_params() {
            (Param::new("params", params), Expr::ident("params"))
        } else {
            (Param::optional("params", params), params_or_empty())
        };
        let ret = TsType::promise(TsType::generic(
            format!("{}.CallMethodResult", self.types),
            vec![name],
        ));
        let call = Expr::call(
            "callMethod",
            vec![
                Expr::ident(self.name()),
                Expr::ident("this"),
                Expr::str(&function.name),
                call_params,
                Expr::ident("getContractByCodeHash"),
            ],
        );
        async_arrow(vec![param], ret, vec![Stmt::Return(call)])
    }

    fn multicall(&self) -> Method {
        let results = TsType::generic(
            format!("{}.MultiCallResults", self.types),
            vec![TsType::named("Calls")],
        );
        let call = Expr::call(
            "multicallMethods",
            vec![
                Expr::ident(self.name()),
                Expr::ident("this"),
                Expr::ident("calls"),
                Expr::ident("getContractByCodeHash"),
            ],
        );
        Method {
            name: "multicall".to_string(),
            is_static: false,
            is_async: true,
            generics: vec![format!("Calls extends {}.MultiCallParams", self.types)],
            params: vec![Param::new("calls", TsType::named("Calls"))],
            ret: Some(TsType::promise(results.clone())),
            body: vec![Stmt::Return(call.awaited().paren().cast(results))],
        }
    }
}

fn subscription_params(options: TsType) -> Vec<Param> {
    vec![
        Param::new("options", options),
        Param::optional("fromCount", TsType::named("number")),
    ]
}

fn event_type(event: &EventSig) -> TypeAlias {
    let ty = if event.fields.is_empty() {
        TsType::omit(TsType::named("ContractEvent"), &["fields"])
    } else {
        TsType::generic("ContractEvent", vec![params_record(&event.fields)])
    };
    TypeAlias::exported(event_type_name(event), ty)
}

/// The call-method table and the helper types indexing into it.
fn call_method_types(callable: &[&FunctionSig]) -> Vec<Item> {
    let entries = callable
        .iter()
        .map(|function| {
            let params = if function.has_params() {
                TsType::generic("CallContractParams", vec![params_record(&function.params)])
            } else {
                TsType::omit(
                    TsType::generic("CallContractParams", vec![TsType::empty_object()]),
                    &["args"],
                )
            };
            let result =
                TsType::generic("CallContractResult", vec![returns_type(&function.returns)]);
            PropertySig::new(
                &function.name,
                TsType::Object(vec![
                    PropertySig::new("params", params),
                    PropertySig::new("result", result),
                ]),
            )
        })
        .collect();
    vec![
        Interface {
            name: "CallMethodTable".to_string(),
            exported: true,
            members: entries,
        }
        .into(),
        TypeAlias::exported("CallMethodParams", TsType::raw(r#"CallMethodTable[T]["params"]"#))
            .with_generic("T extends keyof CallMethodTable")
            .into(),
        TypeAlias::exported("CallMethodResult", TsType::raw(r#"CallMethodTable[T]["result"]"#))
            .with_generic("T extends keyof CallMethodTable")
            .into(),
        TypeAlias::exported(
            "MultiCallParams",
            TsType::generic(
                "Partial",
                vec![TsType::raw(
                    r#"{ [Name in keyof CallMethodTable]: CallMethodTable[Name]["params"] }"#,
                )],
            ),
        )
        .into(),
        TypeAlias::exported(
            "MultiCallResults",
            TsType::raw(
                r#"{ [MaybeName in keyof T]: MaybeName extends keyof CallMethodTable ? CallMethodTable[MaybeName]["result"] : undefined }"#,
            ),
        )
        .with_generic("T extends MultiCallParams")
        .into(),
    ]
}
