use crate::{ClassType, FunctionType, Type, TypeEnv};

/// Whether class names are abbreviated for UI display or fully qualified for
/// generated source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeDisplay {
    Short,
    Qualified,
}

/// Render `ty` as Kotlin source text.
///
/// Pure and deterministic. The two modes always produce structurally
/// identical renderings; they differ only in how class names are spelled.
pub fn render_type(env: &dyn TypeEnv, ty: &Type, mode: TypeDisplay) -> String {
    match ty {
        Type::Class(ClassType { def, args }) => {
            let name = match env.class(*def) {
                Some(class) => match mode {
                    TypeDisplay::Qualified => class.name.clone(),
                    TypeDisplay::Short => short_name(&class.name).to_string(),
                },
                None => "???".to_string(),
            };
            if args.is_empty() {
                name
            } else {
                let args: Vec<String> =
                    args.iter().map(|a| render_type(env, a, mode)).collect();
                format!("{name}<{}>", args.join(", "))
            }
        }
        Type::TypeVar(id) => env
            .type_param(*id)
            .map(|tp| tp.name.clone())
            .unwrap_or_else(|| "???".to_string()),
        Type::Function(f) => render_function_type(env, f, mode),
        Type::Nullable(inner) => {
            // `(() -> Unit)?` and `(T & Any)?` need parentheses to parse.
            if matches!(inner.as_ref(), Type::Function(_) | Type::DefinitelyNonNull(_)) {
                format!("({})?", render_type(env, inner, mode))
            } else {
                format!("{}?", render_type(env, inner, mode))
            }
        }
        Type::DefinitelyNonNull(inner) => {
            format!("{} & Any", render_type(env, inner, mode))
        }
        Type::Error => "???".to_string(),
    }
}

fn render_function_type(env: &dyn TypeEnv, f: &FunctionType, mode: TypeDisplay) -> String {
    let mut out = String::new();
    if f.is_suspend {
        out.push_str("suspend ");
    }
    if let Some(receiver) = &f.receiver {
        // Function-type receivers themselves need parentheses.
        if matches!(receiver.as_ref(), Type::Function(_)) {
            out.push('(');
            out.push_str(&render_type(env, receiver, mode));
            out.push(')');
        } else {
            out.push_str(&render_type(env, receiver, mode));
        }
        out.push('.');
    }
    let params: Vec<String> = f
        .params
        .iter()
        .map(|p| render_type(env, p, mode))
        .collect();
    out.push('(');
    out.push_str(&params.join(", "));
    out.push_str(") -> ");
    out.push_str(&render_type(env, &f.ret, mode));
    out
}

/// Last dotted segment of a qualified name.
fn short_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}
