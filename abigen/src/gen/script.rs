//! Bindings of executable scripts, all of which live in one unit.
use super::{ty::record, WEB3_PACKAGE};
use crate::decl::{Expr, Import, SourceUnit, Variable};
use abigen_types::ScriptAbi;

pub const SCRIPTS_UNIT: &str = "scripts";

const WEB3_IMPORTS: [&str; 7] = [
    "Address",
    "ExecutableScript",
    "ExecuteScriptParams",
    "ExecuteScriptResult",
    "Script",
    "SignerProvider",
    "HexString",
];

fn json_name(script: &ScriptAbi) -> String {
    format!("{}ScriptJson", script.name)
}

/// `export const <Name> = new ExecutableScript<Fields>(Script.fromJson(<Name>ScriptJson))`
pub fn generate_script(script: &ScriptAbi) -> Variable {
    let fields = record(
        script
            .fields
            .iter()
            .filter(|field| !field.is_sentinel())
            .map(|field| (field.name.as_str(), &field.ty)),
    );
    let binding = Expr::New {
        class: "ExecutableScript".to_string(),
        type_args: vec![fields],
        args: vec![Expr::call(
            "Script.fromJson",
            vec![Expr::ident(json_name(script))],
        )],
    };
    Variable::constant(&script.name, binding).exported()
}

/// Generates the scripts unit. Each script comes with its artifact path relative to
/// the artifact directory; bindings are sorted by script name.
pub fn generate_scripts<'a>(
    scripts: impl IntoIterator<Item = (&'a ScriptAbi, &'a str)>,
) -> SourceUnit {
    let mut scripts = scripts.into_iter().collect::<Vec<_>>();
    scripts.sort_by(|(a, _), (b, _)| a.name.cmp(&b.name));

    let mut unit = SourceUnit::new(SCRIPTS_UNIT);
    unit.push(Import::named(WEB3_IMPORTS, WEB3_PACKAGE));
    for (script, artifact_path) in &scripts {
        unit.push(Import::default_as(
            json_name(script),
            format!("../{artifact_path}"),
        ));
    }
    for (script, _) in &scripts {
        unit.push(generate_script(script));
    }
    unit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{typescript::expr_inline, Syntax, TypeScript};
    use abigen_types::{Field, ScalarKind, TypeExpr};
    use expect_test::expect;
    use pretty_assertions::assert_eq;

    fn script(name: &str, fields: &[(&str, ScalarKind)]) -> ScriptAbi {
        ScriptAbi {
            name: name.to_string(),
            fields: fields
                .iter()
                .map(|(name, kind)| Field {
                    name: name.to_string(),
                    ty: TypeExpr::Scalar(*kind),
                    is_mutable: false,
                })
                .collect(),
        }
    }

    #[test]
    fn parameterless_script_gets_empty_record() {
        let binding = generate_script(&script("Noop", &[]));
        assert_eq!(
            expr_inline(&binding.value),
            "new ExecutableScript<{}>(Script.fromJson(NoopScriptJson))"
        );
    }

    #[test]
    fn scripts_unit_is_sorted_by_name() {
        let main = script("Main", &[("addContractId", ScalarKind::ByteVec)]);
        let destroy = script(
            "DestroyAdd",
            &[("add", ScalarKind::ByteVec), ("caller", ScalarKind::Address)],
        );
        let unit = generate_scripts([
            (&main, "add/Main.ral.json"),
            (&destroy, "add/DestroyAdd.ral.json"),
        ]);
        assert!(unit.variable("Main").unwrap().exported);

        expect![[r#"
            /* Autogenerated file. Do not edit manually. */
            /* tslint:disable */
            /* eslint-disable */

            import {
              Address,
              ExecutableScript,
              ExecuteScriptParams,
              ExecuteScriptResult,
              Script,
              SignerProvider,
              HexString,
            } from "@alephium/web3";
            import { default as DestroyAddScriptJson } from "../add/DestroyAdd.ral.json";
            import { default as MainScriptJson } from "../add/Main.ral.json";

            export const DestroyAdd = new ExecutableScript<{ add: HexString; caller: Address }>(
              Script.fromJson(DestroyAddScriptJson)
            );

            export const Main = new ExecutableScript<{ addContractId: HexString }>(
              Script.fromJson(MainScriptJson)
            );
        "#]]
        .assert_eq(&TypeScript::render(&unit));
    }
}
