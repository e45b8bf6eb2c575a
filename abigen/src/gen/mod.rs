//! Generators building [SourceUnit](crate::decl::SourceUnit)s from the typed ABI.
pub mod contract;
pub mod literal;
pub mod script;
pub mod support;
pub mod ty;

use crate::decl::{Arrow, ArrowBody, Expr, Param, Stmt, TsType};

pub use contract::generate_contract;
pub use script::generate_scripts;

/// Runtime package the generated bindings are written against.
pub const WEB3_PACKAGE: &str = "@alephium/web3";
/// Package of the deploy tool, which owns the deployment result types.
pub const CLI_PACKAGE: &str = "@alephium/cli";

pub fn contract_types_name(contract: &str) -> String {
    format!("{contract}Types")
}

pub fn instance_name(contract: &str) -> String {
    format!("{contract}Instance")
}

/// `params === undefined ? {} : params`
pub(crate) fn params_or_empty() -> Expr {
    Expr::cond(
        Expr::ident("params").strict_eq(Expr::Undefined),
        Expr::empty_object(),
        Expr::ident("params"),
    )
}

pub(crate) fn async_arrow(params: Vec<Param>, ret: TsType, body: Vec<Stmt>) -> Expr {
    Expr::arrow(Arrow {
        is_async: true,
        params,
        ret: Some(ret),
        body: ArrowBody::Block(body),
    })
}
