use serde::{Deserialize, Serialize};
use taiga_types::{
    render_type, ClassType, FunModifiers, ParamDef, Type, TypeDisplay, TypeEnv,
};

/// A function-level type parameter carried into the corrected signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParamDecl {
    pub name: String,
    pub upper_bound: Option<Type>,
}

/// Value object describing one corrected signature.
///
/// Built fresh per reconciliation attempt; owns no reference back to syntax
/// trees except through the source text eventually rendered from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSignature {
    pub name: String,
    pub receiver: Option<Type>,
    pub type_params: Vec<TypeParamDecl>,
    pub params: Vec<ParamDef>,
    pub return_type: Type,
    pub modifiers: FunModifiers,
}

/// Render `sig` as Kotlin source text.
///
/// Deterministic and pure. The short mode is for menus and previews; the
/// qualified mode produces source that compiles without relying on ambient
/// imports. Both modes always describe the identical structural signature.
pub fn render_signature(
    env: &dyn TypeEnv,
    sig: &FunctionSignature,
    mode: TypeDisplay,
) -> String {
    let mut out = String::new();

    let m = &sig.modifiers;
    for (set, keyword) in [
        (m.is_suspend, "suspend "),
        (m.is_operator, "operator "),
        (m.is_infix, "infix "),
        (m.is_external, "external "),
        (m.is_inline, "inline "),
        (m.is_tailrec, "tailrec "),
    ] {
        if set {
            out.push_str(keyword);
        }
    }

    out.push_str("fun ");

    if !sig.type_params.is_empty() {
        let decls: Vec<String> = sig
            .type_params
            .iter()
            .map(|tp| match &tp.upper_bound {
                Some(bound) => format!("{} : {}", tp.name, render_type(env, bound, mode)),
                None => tp.name.clone(),
            })
            .collect();
        out.push('<');
        out.push_str(&decls.join(", "));
        out.push_str("> ");
    }

    if let Some(receiver) = &sig.receiver {
        // `fun (() -> Unit).call()` and `fun (T & Any).frob()` need the
        // parentheses to parse unambiguously.
        if matches!(receiver, Type::Function(_) | Type::DefinitelyNonNull(_)) {
            out.push('(');
            out.push_str(&render_type(env, receiver, mode));
            out.push(')');
        } else {
            out.push_str(&render_type(env, receiver, mode));
        }
        out.push('.');
    }

    out.push_str(&sig.name);
    out.push('(');
    let params: Vec<String> = sig
        .params
        .iter()
        .map(|p| render_param(env, p, mode))
        .collect();
    out.push_str(&params.join(", "));
    out.push(')');

    if !denotes_unit(&sig.return_type, env) {
        out.push_str(": ");
        out.push_str(&render_type(env, &sig.return_type, mode));
    }

    out
}

/// Render a single `name: Type` parameter, with `vararg` prefix and default
/// value suffix when present.
pub(crate) fn render_param(env: &dyn TypeEnv, param: &ParamDef, mode: TypeDisplay) -> String {
    let mut out = String::new();
    if param.is_vararg {
        out.push_str("vararg ");
    }
    out.push_str(&param.name);
    out.push_str(": ");
    out.push_str(&render_type(env, &param.ty, mode));
    if let Some(default) = &param.default_value {
        out.push_str(" = ");
        out.push_str(default);
    }
    out
}

fn denotes_unit(ty: &Type, env: &dyn TypeEnv) -> bool {
    matches!(ty, Type::Class(ClassType { def, args }) if *def == env.well_known().unit && args.is_empty())
}
