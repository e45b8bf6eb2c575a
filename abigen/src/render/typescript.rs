//! TypeScript output, laid out the way prettier would lay out the generated bindings.
use super::{
    printer::{Printer, MAX_WIDTH},
    Syntax,
};
use crate::decl::{
    Arrow, ArrowBody, BinOp, Class, ClassMember, Expr, Function, Import, ImportKind, Interface, Item,
    Method, ObjectEntry, Param, PropertySig, SourceUnit, Stmt, TsType, TypeAlias, VarKind,
    Variable,
};
use itertools::Itertools;

pub const AUTOGENERATED_HEADER: [&str; 3] = [
    "/* Autogenerated file. Do not edit manually. */",
    "/* tslint:disable */",
    "/* eslint-disable */",
];

pub struct TypeScript;

impl Syntax for TypeScript {
    const EXTENSION: &'static str = "ts";

    fn render(unit: &SourceUnit) -> String {
        let mut p = Printer::new();
        if unit.autogenerated {
            for line in AUTOGENERATED_HEADER {
                p.line(line);
            }
            p.newline();
        }
        items(&mut p, &unit.items);
        p.finish()
    }
}

/// Renders a type expression on a single line.
pub fn type_inline(ty: &TsType) -> String {
    match ty {
        TsType::Named(name) | TsType::Raw(name) => name.clone(),
        TsType::Generic(name, args) => {
            format!("{name}<{}>", args.iter().map(type_inline).join(", "))
        }
        TsType::Tuple(elems) => format!("[{}]", elems.iter().map(type_inline).join(", ")),
        TsType::Object(members) if members.is_empty() => "{}".to_string(),
        TsType::Object(members) => {
            let members = members.iter().map(property_sig_inline).collect::<Vec<_>>();
            format!("{{ {} }}", members.join("; "))
        }
        TsType::Union(variants) => variants
            .iter()
            .map(type_inline)
            .collect::<Vec<_>>()
            .join(" | "),
        TsType::StrLit(text) => quote(text),
        TsType::Array(elem) => match elem.as_ref() {
            TsType::Union(_) => format!("({})[]", type_inline(elem)),
            _ => format!("{}[]", type_inline(elem)),
        },
    }
}

/// Renders an expression on its own, starting at column zero.
pub fn expr_inline(e: &Expr) -> String {
    let mut p = Printer::new();
    expr(&mut p, e);
    p.finish()
}

/// A double-quoted string literal with JSON escaping.
fn quote(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

fn property_sig_inline(sig: &PropertySig) -> String {
    let optional = if sig.optional { "?" } else { "" };
    format!("{}{optional}: {}", sig.name, type_inline(&sig.ty))
}

fn items(p: &mut Printer, items: &[Item]) {
    let mut prev: Option<&Item> = None;
    for current in items {
        if prev.map_or(false, |prev| separated(prev, current)) {
            p.blank_line();
        }
        item(p, current);
        prev = Some(current);
    }
}

/// Whether a blank line goes between two consecutive items.
fn separated(prev: &Item, current: &Item) -> bool {
    !matches!(
        (prev, current),
        (Item::Comment(_), _)
            | (Item::Import(_), Item::Import(_))
            | (Item::ReExport(_), Item::ReExport(_))
    )
}

fn item(p: &mut Printer, item: &Item) {
    match item {
        Item::Import(import) => import_decl(p, import),
        Item::ReExport(path) => p.line(&format!("export * from {};", quote(path))),
        Item::Comment(text) => p.line(&format!("// {text}")),
        Item::Namespace(ns) => {
            p.line(&format!("export namespace {} {{", ns.name));
            p.indented(|p| items(p, &ns.items));
            p.line("}");
        }
        Item::TypeAlias(alias) => type_alias(p, alias),
        Item::Interface(interface) => interface_decl(p, interface),
        Item::Class(class) => class_decl(p, class),
        Item::Variable(var) => {
            variable(p, var);
            p.newline();
        }
        Item::Function(function) => function_decl(p, function),
    }
}

fn import_decl(p: &mut Printer, import: &Import) {
    let from = quote(&import.from);
    match &import.kind {
        ImportKind::Default(name) => {
            p.line(&format!("import {{ default as {name} }} from {from};"))
        }
        ImportKind::Named(names) => {
            let single = format!("import {{ {} }} from {from};", names.join(", "));
            if single.len() <= MAX_WIDTH {
                p.line(&single);
                return;
            }
            p.line("import {");
            p.indented(|p| {
                for name in names {
                    p.line(&format!("{name},"));
                }
            });
            p.line(&format!("}} from {from};"));
        }
    }
}

fn generics(generics: &[String]) -> String {
    if generics.is_empty() {
        String::new()
    } else {
        format!("<{}>", generics.join(", "))
    }
}

fn export_prefix(exported: bool) -> &'static str {
    if exported {
        "export "
    } else {
        ""
    }
}

fn type_alias(p: &mut Printer, alias: &TypeAlias) {
    p.write(&format!(
        "{}type {}{} = ",
        export_prefix(alias.exported),
        alias.name,
        generics(&alias.generics)
    ));
    type_block(p, &alias.ty);
    p.line(";");
}

/// Writes object types one member per line, anything else inline.
fn type_block(p: &mut Printer, ty: &TsType) {
    match ty {
        TsType::Object(members) if !members.is_empty() => {
            p.line("{");
            p.indented(|p| {
                for member in members {
                    property_sig(p, member);
                }
            });
            p.write("}");
        }
        _ => p.write(&type_inline(ty)),
    }
}

fn property_sig(p: &mut Printer, sig: &PropertySig) {
    let optional = if sig.optional { "?" } else { "" };
    p.write(&format!("{}{optional}: ", sig.name));
    type_block(p, &sig.ty);
    p.line(";");
}

fn interface_decl(p: &mut Printer, interface: &Interface) {
    p.line(&format!(
        "{}interface {} {{",
        export_prefix(interface.exported),
        interface.name
    ));
    p.indented(|p| {
        for member in &interface.members {
            property_sig(p, member);
        }
    });
    p.line("}");
}

fn class_decl(p: &mut Printer, class: &Class) {
    let extends = class
        .extends
        .as_ref()
        .map(|ty| format!(" extends {}", type_inline(ty)))
        .unwrap_or_default();
    p.line(&format!(
        "{}class {}{extends} {{",
        export_prefix(class.exported),
        class.name
    ));
    p.indented(|p| {
        for (index, member) in class.members.iter().enumerate() {
            if index > 0 {
                p.blank_line();
            }
            class_member(p, member);
        }
    });
    p.line("}");
}

fn class_member(p: &mut Printer, member: &ClassMember) {
    match member {
        ClassMember::Constructor { params, body } => {
            p.write("constructor");
            param_list(p, params, " {".len());
            block(p, body);
        }
        ClassMember::Method(method) => method_decl(p, method),
        ClassMember::Property { name, value } => {
            p.write(&format!("{name} = "));
            expr(p, value);
            p.line(";");
        }
    }
}

fn return_annotation(ret: &Option<TsType>) -> String {
    ret.as_ref()
        .map(|ty| format!(": {}", type_inline(ty)))
        .unwrap_or_default()
}

fn method_decl(p: &mut Printer, method: &Method) {
    let mut head = String::new();
    if method.is_static {
        head.push_str("static ");
    }
    if method.is_async {
        head.push_str("async ");
    }
    head.push_str(&method.name);
    head.push_str(&generics(&method.generics));
    p.write(&head);
    let ret = return_annotation(&method.ret);
    param_list(p, &method.params, ret.len() + " {".len());
    p.write(&ret);
    block(p, &method.body);
}

fn function_decl(p: &mut Printer, function: &Function) {
    p.write(&format!(
        "{}function {}{}",
        export_prefix(function.exported),
        function.name,
        generics(&function.generics)
    ));
    let ret = return_annotation(&function.ret);
    param_list(p, &function.params, ret.len() + " {".len());
    p.write(&ret);
    block(p, &function.body);
}

/// Writes ` {`, the statements and the closing brace.
fn block(p: &mut Printer, body: &[Stmt]) {
    p.line(" {");
    p.indented(|p| {
        for s in body {
            stmt(p, s);
        }
    });
    p.line("}");
}

fn param_inline(param: &Param) -> String {
    let optional = if param.optional { "?" } else { "" };
    match &param.ty {
        Some(ty) => format!("{}{optional}: {}", param.name, type_inline(ty)),
        None => format!("{}{optional}", param.name),
    }
}

/// Writes a parenthesised parameter list, one parameter per line if it would not fit.
fn param_list(p: &mut Printer, params: &[Param], tail: usize) {
    let inline = format!("({})", params.iter().map(param_inline).join(", "));
    if params.is_empty() || p.fits(inline.len() + tail) {
        p.write(&inline);
        return;
    }
    p.line("(");
    p.indented(|p| {
        for (index, param) in params.iter().enumerate() {
            p.write(&param_inline(param));
            if index + 1 < params.len() {
                p.write(",");
            }
            p.newline();
        }
    });
    p.write(")");
}

fn variable(p: &mut Printer, var: &Variable) {
    let kind = match var.kind {
        VarKind::Const => "const",
        VarKind::Let => "let",
    };
    let ty = var
        .ty
        .as_ref()
        .map(|ty| format!(": {}", type_inline(ty)))
        .unwrap_or_default();
    p.write(&format!(
        "{}{kind} {}{ty} = ",
        export_prefix(var.exported),
        var.name
    ));
    expr(p, &var.value);
    p.write(";");
}

fn stmt(p: &mut Printer, s: &Stmt) {
    match s {
        Stmt::Return(e) => {
            p.write("return ");
            expr(p, e);
            p.line(";");
        }
        Stmt::Expr(e) => {
            expr(p, e);
            p.line(";");
        }
        Stmt::Variable(var) => {
            variable(p, var);
            p.newline();
        }
        Stmt::If {
            cond,
            then,
            otherwise,
        } => {
            p.write("if (");
            expr(p, cond);
            p.line(") {");
            p.indented(|p| then.iter().for_each(|s| stmt(p, s)));
            if !otherwise.is_empty() {
                p.line("} else {");
                p.indented(|p| otherwise.iter().for_each(|s| stmt(p, s)));
            }
            p.line("}");
        }
        Stmt::Throw(e) => {
            p.write("throw ");
            expr(p, e);
            p.line(";");
        }
    }
}

fn type_args(args: &[TsType]) -> String {
    if args.is_empty() {
        String::new()
    } else {
        format!("<{}>", args.iter().map(type_inline).join(", "))
    }
}

/// Objects and block-bodied arrows can open on the line of the call they are the last argument of.
fn huggable(e: &Expr) -> bool {
    match e {
        Expr::Object(entries) => !entries.is_empty(),
        Expr::Arrow(arrow) => matches!(arrow.body, ArrowBody::Block(_)),
        _ => false,
    }
}

/// Writes a parenthesised argument list, one argument per line if it would not fit.
fn arg_list(p: &mut Printer, args: &[Expr]) {
    let rendered = args.iter().map(expr_inline).collect::<Vec<_>>();
    let inline = rendered.join(", ");
    if !inline.contains('\n') && p.fits(inline.len() + "();".len()) {
        p.write(&format!("({inline})"));
        return;
    }
    if let Some((last, init)) = args.split_last() {
        let head = &rendered[..init.len()];
        let head_width = head.iter().map(|arg| arg.len() + ", ".len()).sum::<usize>();
        if huggable(last) && head.iter().all(|arg| !arg.contains('\n')) && p.fits(head_width + 3) {
            p.write("(");
            for arg in head {
                p.write(arg);
                p.write(", ");
            }
            expr(p, last);
            p.write(")");
            return;
        }
    }
    p.line("(");
    p.indented(|p| {
        for (index, arg) in args.iter().enumerate() {
            expr(p, arg);
            if index + 1 < args.len() {
                p.write(",");
            }
            p.newline();
        }
    });
    p.write(")");
}

/// Writes `e`, parenthesised if it binds looser than member access.
fn operand(p: &mut Printer, e: &Expr) {
    match e {
        Expr::Await(_) | Expr::As(..) | Expr::Cond(..) | Expr::Binary(..) | Expr::Arrow(_) => {
            p.write("(");
            expr(p, e);
            p.write(")");
        }
        _ => expr(p, e),
    }
}

fn expr(p: &mut Printer, e: &Expr) {
    match e {
        Expr::Ident(name) => p.write(name),
        Expr::Str(text) => p.write(&quote(text)),
        Expr::BigInt(digits) => p.write(&format!("BigInt({})", quote(digits))),
        Expr::Bool(value) => p.write(if *value { "true" } else { "false" }),
        Expr::Number(value) => p.write(&value.to_string()),
        Expr::Undefined => p.write("undefined"),
        Expr::Array(elems) => {
            let rendered = elems.iter().map(expr_inline).collect::<Vec<_>>();
            let inline = rendered.join(", ");
            if !inline.contains('\n') && p.fits(inline.len() + "[];".len()) {
                p.write(&format!("[{inline}]"));
                return;
            }
            p.line("[");
            p.indented(|p| {
                for elem in elems {
                    expr(p, elem);
                    p.line(",");
                }
            });
            p.write("]");
        }
        Expr::Object(entries) if entries.is_empty() => p.write("{}"),
        Expr::Object(entries) => {
            p.line("{");
            p.indented(|p| {
                for entry in entries {
                    match entry {
                        ObjectEntry::Field(key, value) => {
                            p.write(&format!("{key}: "));
                            expr(p, value);
                        }
                        ObjectEntry::Spread(value) => {
                            p.write("...");
                            expr(p, value);
                        }
                    }
                    p.line(",");
                }
            });
            p.write("}");
        }
        Expr::Call {
            callee,
            type_args: targs,
            args,
        } => {
            operand(p, callee);
            p.write(&type_args(targs));
            arg_list(p, args);
        }
        Expr::New {
            class,
            type_args: targs,
            args,
        } => {
            p.write(&format!("new {class}{}", type_args(targs)));
            arg_list(p, args);
        }
        Expr::Member(target, name) => {
            operand(p, target);
            p.write(&format!(".{name}"));
        }
        Expr::Index(target, key) => {
            operand(p, target);
            p.write("[");
            expr(p, key);
            p.write("]");
        }
        Expr::Arrow(arrow) => arrow_fn(p, arrow),
        Expr::Await(inner) => {
            p.write("await ");
            expr(p, inner);
        }
        Expr::As(inner, ty) => {
            expr(p, inner);
            p.write(&format!(" as {}", type_inline(ty)));
        }
        Expr::Cond(cond, then, otherwise) => {
            let mut flat = Printer::new();
            cond_flat(&mut flat, cond, then, otherwise);
            let inline = flat.finish();
            if !inline.contains('\n') && p.fits(inline.len() + 1) {
                p.write(&inline);
                return;
            }
            expr(p, cond);
            p.newline();
            p.indented(|p| {
                p.write("? ");
                expr(p, then);
                p.newline();
                p.write(": ");
                expr(p, otherwise);
            });
        }
        Expr::Binary(lhs, BinOp::Add, rhs) => {
            let inline = format!("{} + {}", expr_inline(lhs), expr_inline(rhs));
            if !inline.contains('\n') && p.fits(inline.len() + ");".len()) {
                p.write(&inline);
            } else {
                concat(p, &concat_operands(e));
            }
        }
        Expr::Binary(lhs, op, rhs) => {
            expr(p, lhs);
            p.write(&format!(" {} ", op.as_str()));
            expr(p, rhs);
        }
        Expr::Paren(inner) => {
            p.write("(");
            expr(p, inner);
            p.write(")");
        }
    }
}

/// The operands of a left-nested `+` chain.
fn concat_operands(e: &Expr) -> Vec<&Expr> {
    match e {
        Expr::Binary(lhs, BinOp::Add, rhs) => {
            let mut operands = concat_operands(lhs);
            operands.push(&**rhs);
            operands
        }
        _ => vec![e],
    }
}

/// Writes a `+` chain with every operand after the first on its own continuation line.
fn concat(p: &mut Printer, operands: &[&Expr]) {
    let Some((first, rest)) = operands.split_first() else {
        return;
    };
    expr(p, first);
    p.indented(|p| {
        for operand in rest {
            p.line(" +");
            expr(p, operand);
        }
    });
}

fn cond_flat(p: &mut Printer, cond: &Expr, then: &Expr, otherwise: &Expr) {
    expr(p, cond);
    p.write(" ? ");
    expr(p, then);
    p.write(" : ");
    expr(p, otherwise);
}

fn arrow_fn(p: &mut Printer, arrow: &Arrow) {
    if arrow.is_async {
        p.write("async ");
    }
    let ret = return_annotation(&arrow.ret);
    param_list(p, &arrow.params, ret.len() + " => {".len());
    p.write(&ret);
    p.write(" => ");
    match &arrow.body {
        ArrowBody::Expr(body @ Expr::Object(_)) => {
            p.write("(");
            expr(p, body);
            p.write(")");
        }
        ArrowBody::Expr(body) => expr(p, body),
        ArrowBody::Block(body) => {
            p.line("{");
            p.indented(|p| body.iter().for_each(|s| stmt(p, s)));
            p.write("}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::{Namespace, PropertySig};
    use expect_test::expect;

    #[test]
    fn renders_types_inline() {
        let ty = TsType::omit(
            TsType::generic(
                "TestContractParams",
                vec![
                    TsType::named("never"),
                    TsType::Object(vec![
                        PropertySig::new("to", TsType::named("Address")),
                        PropertySig::optional("amount", TsType::named("bigint")),
                    ]),
                ],
            ),
            &["initialFields"],
        );
        assert_eq!(
            type_inline(&ty),
            r#"Omit<TestContractParams<never, { to: Address; amount?: bigint }>, "initialFields">"#
        );
        let union = TsType::Array(Box::new(TsType::Union(vec![
            TsType::named("bigint"),
            TsType::named("boolean"),
        ])));
        assert_eq!(type_inline(&union), "(bigint | boolean)[]");
    }

    #[test]
    fn strings_are_json_escaped() {
        assert_eq!(expr_inline(&Expr::str("say \"hi\"\n")), r#""say \"hi\"\n""#);
        assert_eq!(expr_inline(&Expr::BigInt("42".into())), r#"BigInt("42")"#);
    }

    #[test]
    fn renders_namespace_unit() {
        let mut unit = SourceUnit::new("Sample");
        unit.push(Import::named(["Address", "HexString"], "@alephium/web3"));
        unit.push(Import::default_as(
            "SampleContractJson",
            "../sample/Sample.ral.json",
        ));
        unit.push(Item::Comment("Custom types for the contract".to_string()));
        unit.push(Namespace {
            name: "SampleTypes".to_string(),
            items: vec![
                TypeAlias::exported(
                    "Fields",
                    TsType::Object(vec![
                        PropertySig::new("owner", TsType::named("Address")),
                        PropertySig::new(
                            "values",
                            TsType::Tuple(vec![TsType::named("bigint"), TsType::named("bigint")]),
                        ),
                    ]),
                )
                .into(),
                TypeAlias::exported(
                    "State",
                    TsType::generic("ContractState", vec![TsType::named("Fields")]),
                )
                .into(),
            ],
        });
        unit.push(Variable::constant("answer", Expr::BigInt("42".to_string())).exported());

        expect![[r#"
            /* Autogenerated file. Do not edit manually. */
            /* tslint:disable */
            /* eslint-disable */

            import { Address, HexString } from "@alephium/web3";
            import { default as SampleContractJson } from "../sample/Sample.ral.json";

            // Custom types for the contract
            export namespace SampleTypes {
              export type Fields = {
                owner: Address;
                values: [bigint, bigint];
              };

              export type State = ContractState<Fields>;
            }

            export const answer = BigInt("42");
        "#]]
        .assert_eq(&TypeScript::render(&unit));
    }

    #[test]
    fn breaks_long_calls_and_renders_classes() {
        let mut unit = SourceUnit::new("lookup");
        unit.autogenerated = false;
        unit.push(Function {
            name: "lookup".to_string(),
            exported: true,
            generics: vec![],
            params: vec![Param::new("codeHash", TsType::named("string"))],
            ret: Some(TsType::named("Contract")),
            body: vec![Stmt::Return(Expr::call(
                "findContractByCodeHashInRegistry",
                vec![
                    Expr::ident("registeredContracts"),
                    Expr::ident("codeHash"),
                    Expr::str("fallback"),
                ],
            ))],
        });
        unit.push(Class {
            name: "Counter".to_string(),
            exported: true,
            extends: Some(TsType::named("ContractInstance")),
            members: vec![
                ClassMember::Constructor {
                    params: vec![Param::new("address", TsType::named("Address"))],
                    body: vec![Stmt::Expr(Expr::call("super", vec![Expr::ident("address")]))],
                },
                ClassMember::Property {
                    name: "eventIndex".to_string(),
                    value: Expr::object([
                        ("Incremented", Expr::Number(0)),
                        ("Reset", Expr::Number(1)),
                    ]),
                },
                Method::new(
                    "fetchState",
                    vec![],
                    TsType::promise(TsType::named("CounterTypes.State")),
                    vec![Stmt::Return(Expr::call(
                        "fetchContractState",
                        vec![Expr::ident("Counter"), Expr::ident("this")],
                    ))],
                )
                .asynchronous()
                .into(),
            ],
        });

        expect![[r#"
            export function lookup(codeHash: string): Contract {
              return findContractByCodeHashInRegistry(
                registeredContracts,
                codeHash,
                "fallback"
              );
            }

            export class Counter extends ContractInstance {
              constructor(address: Address) {
                super(address);
              }

              eventIndex = {
                Incremented: 0,
                Reset: 1,
              };

              async fetchState(): Promise<CounterTypes.State> {
                return fetchContractState(Counter, this);
              }
            }
        "#]]
        .assert_eq(&TypeScript::render(&unit));
    }

    #[test]
    fn object_arguments_hug_the_call() {
        let call = Expr::call(
            "toDeployments",
            vec![Expr::Object(vec![
                ObjectEntry::Spread(Expr::ident("json")),
                ObjectEntry::Field("deployerAddress".to_string(), Expr::str("1DrDyTr9")),
            ])],
        );
        assert_eq!(
            expr_inline(&call),
            "toDeployments({\n  ...json,\n  deployerAddress: \"1DrDyTr9\",\n})"
        );
    }

    #[test]
    fn long_concatenations_break_after_the_operator() {
        let message = |network: &str| {
            Expr::str("The contract has been deployed multiple times on ")
                .binary(BinOp::Add, Expr::ident(network))
                .binary(BinOp::Add, Expr::str(", please specify the deployer address"))
        };
        let mut unit = SourceUnit::new("throws");
        unit.autogenerated = false;
        unit.push(Function {
            name: "fail".to_string(),
            exported: false,
            generics: vec![],
            params: vec![Param::new("networkId", TsType::named("string"))],
            ret: None,
            body: vec![
                Stmt::if_then(
                    Expr::ident("networkId").strict_eq(Expr::str("")),
                    vec![Stmt::Throw(Expr::call("Error", vec![message("networkId")]))],
                ),
                Stmt::Throw(Expr::call(
                    "Error",
                    vec![Expr::str("not deployed to ").binary(BinOp::Add, Expr::ident("networkId"))],
                )),
            ],
        });

        let rendered = TypeScript::render(&unit);
        expect![[r#"
            function fail(networkId: string) {
              if (networkId === "") {
                throw Error(
                  "The contract has been deployed multiple times on " +
                    networkId +
                    ", please specify the deployer address"
                );
              }
              throw Error("not deployed to " + networkId);
            }
        "#]]
        .assert_eq(&rendered);
        assert!(rendered.lines().all(|line| line.len() <= MAX_WIDTH));
    }
}
