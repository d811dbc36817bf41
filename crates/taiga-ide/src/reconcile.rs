use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use taiga_core::{CancellationToken, Cancelled, TextEdit};
use taiga_types::{
    instantiate_as_supertype, render_type, self_type, substitute, substitution_for, ClassId,
    ClassKind, ClassType, ConstructorDef, FunctionDef, FunctionId, Modality, ParamDef, Type,
    TypeDisplay, TypeEnv, TypeVarId, Visibility,
};

use crate::align::align;
use crate::signature::{render_param, render_signature, FunctionSignature, TypeParamDecl};

/// One fully rendered, ready-to-apply proposed fix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateFix {
    /// Short display form, shown in the quick-fix menu.
    pub title: String,
    /// Fully qualified source form; compiles without ambient imports.
    pub source_text: String,
    pub target: FixTarget,
}

/// Where the host should splice the rendered text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixTarget {
    /// Replace the named declaration's signature.
    ReplaceSignature(FunctionId),
    /// Replace the class's primary constructor parameter list and its
    /// supertype call entry.
    RewritePrimaryConstructor(ClassId),
    /// Apply a plain text edit (trivial fixes).
    Edit(TextEdit),
}

/// Terminal classification of one quick-fix computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixOutcome {
    /// No fix available. Always a silent no-op, never an error.
    None,
    /// Exactly one unique candidate; apply without a menu.
    Apply(CandidateFix),
    /// Several unique candidates; surface a disambiguation choice.
    Choose(Vec<CandidateFix>),
}

impl FixOutcome {
    pub(crate) fn from_candidates(mut candidates: Vec<CandidateFix>) -> FixOutcome {
        match candidates.len() {
            0 => FixOutcome::None,
            1 => FixOutcome::Apply(candidates.remove(0)),
            _ => FixOutcome::Choose(candidates),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, FixOutcome::None)
    }

    /// All candidates in discovery order, regardless of classification.
    pub fn candidates(&self) -> Vec<&CandidateFix> {
        match self {
            FixOutcome::None => Vec::new(),
            FixOutcome::Apply(fix) => vec![fix],
            FixOutcome::Choose(fixes) => fixes.iter().collect(),
        }
    }
}

/// Candidate signatures for a declaration that overrides nothing.
///
/// Targets are collected from the declaring class's supertype graph in
/// declared order: every non-final, non-private, non-synthetic member with
/// the same name. Each target is localized through its inheritance edge,
/// aligned against the existing declaration's parameters, and rendered in
/// both display and source form. Candidates rendering to identical source
/// text are deduplicated.
pub(crate) fn override_mismatch_fixes(
    env: &dyn TypeEnv,
    function: FunctionId,
    token: &CancellationToken,
) -> Result<Vec<CandidateFix>, Cancelled> {
    let Some(class_def) = env.class(function.class) else {
        return Ok(Vec::new());
    };
    if !class_def.is_editable {
        tracing::debug!(class = %class_def.name, "declaration not editable, skipping");
        return Ok(Vec::new());
    }
    let Some(decl) = class_def.functions.get(function.index as usize) else {
        return Ok(Vec::new());
    };
    let Some(self_ty) = self_type(env, function.class) else {
        return Ok(Vec::new());
    };

    let mut candidates = Vec::new();
    let mut seen_sources: HashSet<String> = HashSet::new();

    for super_id in supertype_classes(env, function.class) {
        token.err_if_cancelled()?;

        let Some(super_def) = env.class(super_id) else {
            continue;
        };
        let Some(Type::Class(instantiation)) =
            instantiate_as_supertype(env, &self_ty, super_id)
        else {
            tracing::debug!(supertype = %super_def.name, "no inheritance edge, skipping");
            continue;
        };
        let subst = substitution_for(env, &instantiation);

        for target in &super_def.functions {
            if target.name != decl.name {
                continue;
            }
            if target.modality == Modality::Final
                || target.visibility == Visibility::Private
                || target.is_synthetic_override
            {
                continue;
            }

            let Some(sig) = localized_signature(env, target, &subst, &decl.params) else {
                tracing::debug!(
                    supertype = %super_def.name,
                    member = %target.name,
                    "target signature did not localize, skipping"
                );
                continue;
            };

            let source_text = render_signature(env, &sig, TypeDisplay::Qualified);
            if !seen_sources.insert(source_text.clone()) {
                continue;
            }
            let display = render_signature(env, &sig, TypeDisplay::Short);
            candidates.push(CandidateFix {
                title: format!("Change function signature to '{display}'"),
                source_text,
                target: FixTarget::ReplaceSignature(function),
            });
        }
    }

    Ok(candidates)
}

/// Candidate primary-constructor rewrites for a class whose supertype entry
/// lacks the required constructor call.
///
/// One candidate per supertype constructor that takes at least one parameter,
/// in declaration order. Parameters are localized through the explicit
/// supertype entry, aligned against the existing primary constructor, and
/// forwarded to the supertype call (with a `*` spread for varargs). Existing
/// primary-constructor parameters the alignment did not claim stay in the
/// rewritten parameter list; the rewrite never removes a declared parameter.
pub(crate) fn supertype_call_fixes(
    env: &dyn TypeEnv,
    class: ClassId,
    supertype: &Type,
    token: &CancellationToken,
) -> Result<Vec<CandidateFix>, Cancelled> {
    let Some(class_def) = env.class(class) else {
        return Ok(Vec::new());
    };
    if !class_def.is_editable {
        tracing::debug!(class = %class_def.name, "declaration not editable, skipping");
        return Ok(Vec::new());
    }
    let Type::Class(entry) = supertype else {
        return Ok(Vec::new());
    };
    let Some(super_def) = env.class(entry.def) else {
        return Ok(Vec::new());
    };
    if super_def.kind != ClassKind::Class {
        return Ok(Vec::new());
    }

    let subst = substitution_for(env, entry);
    let existing: &[ParamDef] = class_def
        .primary_constructor()
        .map(|ctor| ctor.params.as_slice())
        .unwrap_or(&[]);

    let mut candidates = Vec::new();
    let mut seen_sources: HashSet<String> = HashSet::new();

    for ctor in &super_def.constructors {
        token.err_if_cancelled()?;

        if ctor.params.is_empty() || ctor.visibility == Visibility::Private {
            continue;
        }
        let Some((forwarded, kept)) = localized_ctor_params(ctor, &subst, existing) else {
            tracing::debug!(
                supertype = %super_def.name,
                "constructor parameters did not localize, skipping"
            );
            continue;
        };

        let source_text =
            render_delegation(env, entry, &forwarded, &kept, TypeDisplay::Qualified);
        if !seen_sources.insert(source_text.clone()) {
            continue;
        }

        let short_types: Vec<String> = forwarded
            .iter()
            .map(|p| render_type(env, &p.ty, TypeDisplay::Short))
            .collect();
        candidates.push(CandidateFix {
            title: format!(
                "Add constructor parameters from {}({})",
                render_type(env, &Type::Class(entry.clone()), TypeDisplay::Short),
                short_types.join(", "),
            ),
            source_text,
            target: FixTarget::RewritePrimaryConstructor(class),
        });
    }

    Ok(candidates)
}

/// Supertype classes reachable from `class`, breadth-first in declared
/// supertype list order, each visited once. `kotlin.Any` is implicit and
/// comes last when not declared explicitly.
fn supertype_classes(env: &dyn TypeEnv, class: ClassId) -> Vec<ClassId> {
    let mut out = Vec::new();
    let mut seen: HashSet<ClassId> = HashSet::new();
    seen.insert(class);

    let mut queue: VecDeque<ClassId> = VecDeque::new();
    let Some(class_def) = env.class(class) else {
        return out;
    };
    for sup in &class_def.super_types {
        if let Type::Class(ClassType { def, .. }) = sup {
            queue.push_back(*def);
        }
    }

    while let Some(id) = queue.pop_front() {
        if !seen.insert(id) {
            continue;
        }
        out.push(id);
        let Some(def) = env.class(id) else {
            continue;
        };
        for sup in &def.super_types {
            if let Type::Class(ClassType { def, .. }) = sup {
                queue.push_back(*def);
            }
        }
    }

    let any = env.well_known().any;
    if !seen.contains(&any) {
        out.push(any);
    }
    out
}

/// Substitute the target member's types into the subtype's context and align
/// its parameters against the existing declaration.
///
/// Returns `None` when any localized type is unresolvable (the caller drops
/// this specific target rather than aborting).
fn localized_signature(
    env: &dyn TypeEnv,
    target: &FunctionDef,
    subst: &HashMap<TypeVarId, Type>,
    existing_params: &[ParamDef],
) -> Option<FunctionSignature> {
    let mut type_params = Vec::with_capacity(target.type_params.len());
    for id in &target.type_params {
        let def = env.type_param(*id)?;
        let upper_bound = def.upper_bound.as_ref().map(|b| substitute(b, subst));
        if upper_bound.as_ref().is_some_and(Type::contains_error) {
            return None;
        }
        type_params.push(TypeParamDecl {
            name: def.name.clone(),
            upper_bound,
        });
    }

    let receiver = target.receiver.as_ref().map(|r| substitute(r, subst));
    if receiver.as_ref().is_some_and(Type::contains_error) {
        return None;
    }
    let return_type = substitute(&target.return_type, subst);
    if return_type.contains_error() {
        return None;
    }

    let localized: Vec<ParamDef> = target
        .params
        .iter()
        .map(|p| ParamDef {
            name: p.name.clone(),
            ty: substitute(&p.ty, subst),
            is_vararg: p.is_vararg,
            default_value: p.default_value.clone(),
        })
        .collect();
    if localized.iter().any(|p| p.ty.contains_error()) {
        return None;
    }

    let aligned = align(&localized, existing_params);
    let params = localized
        .into_iter()
        .zip(aligned)
        .map(|(mut p, decision)| {
            p.name = decision.name;
            p
        })
        .collect();

    Some(FunctionSignature {
        name: target.name.clone(),
        receiver,
        type_params,
        params,
        return_type,
        modifiers: target.modifiers,
    })
}

/// Localize and align a supertype constructor's parameters. Returns the
/// parameters forwarded to the supertype call plus the existing parameters
/// the alignment left unclaimed (kept in the rewritten list, in their
/// declared order).
fn localized_ctor_params(
    ctor: &ConstructorDef,
    subst: &HashMap<TypeVarId, Type>,
    existing: &[ParamDef],
) -> Option<(Vec<ParamDef>, Vec<ParamDef>)> {
    let localized: Vec<ParamDef> = ctor
        .params
        .iter()
        .map(|p| ParamDef {
            name: p.name.clone(),
            ty: substitute(&p.ty, subst),
            is_vararg: p.is_vararg,
            default_value: p.default_value.clone(),
        })
        .collect();
    if localized.iter().any(|p| p.ty.contains_error()) {
        return None;
    }

    let aligned = align(&localized, existing);
    let mut claimed = vec![false; existing.len()];
    for decision in &aligned {
        if let Some(idx) = decision.candidate {
            claimed[idx] = true;
        }
    }

    let forwarded = localized
        .into_iter()
        .zip(aligned)
        .map(|(mut p, decision)| {
            p.name = decision.name;
            p
        })
        .collect();
    let kept = existing
        .iter()
        .zip(&claimed)
        .filter(|(_, claimed)| !**claimed)
        .map(|(p, _)| p.clone())
        .collect();
    Some((forwarded, kept))
}

/// `(<params>) : Super(<args>)`, the replacement for a primary constructor
/// plus its supertype call entry. Only the forwarded parameters become call
/// arguments, vararg ones behind a `*` spread; the kept parameters follow
/// them in the list untouched.
fn render_delegation(
    env: &dyn TypeEnv,
    entry: &ClassType,
    forwarded: &[ParamDef],
    kept: &[ParamDef],
    mode: TypeDisplay,
) -> String {
    let rendered: Vec<String> = forwarded
        .iter()
        .chain(kept)
        .map(|p| render_param(env, p, mode))
        .collect();
    let args: Vec<String> = forwarded
        .iter()
        .map(|p| {
            if p.is_vararg {
                format!("*{}", p.name)
            } else {
                p.name.clone()
            }
        })
        .collect();
    format!(
        "({}) : {}({})",
        rendered.join(", "),
        render_type(env, &Type::Class(entry.clone()), mode),
        args.join(", "),
    )
}
