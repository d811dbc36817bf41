use std::collections::{HashMap, HashSet, VecDeque};

use crate::{substitute, ClassId, ClassType, Type, TypeEnv, TypeVarId};

/// The declared shape of a class as a type: the class applied to its own
/// formal type parameters, e.g. `Box<T>` for `class Box<T>`.
pub fn self_type(env: &dyn TypeEnv, id: ClassId) -> Option<Type> {
    let def = env.class(id)?;
    let args = def.type_params.iter().map(|tp| Type::TypeVar(*tp)).collect();
    Some(Type::class(id, args))
}

/// Return `ty` viewed as `target` by walking the declared supertype graph and
/// applying type argument substitution along the way.
///
/// Best-effort IDE-style recovery: missing class metadata or an unrelated
/// `target` simply returns `None`. Each class declaration is visited at most
/// once, so the walk is bounded by the number of reachable supertype
/// declarations even when a malformed hierarchy instantiates a class with
/// ever-growing arguments (`class A<T> : B<List<T>>; class B<T> : A<List<T>>`).
///
/// Example: `Box<String>` declared as `class Box<T> : Container<List<T>>`
/// viewed as `Container` returns `Container<List<String>>`.
pub fn instantiate_as_supertype(env: &dyn TypeEnv, ty: &Type, target: ClassId) -> Option<Type> {
    fn inner(
        env: &dyn TypeEnv,
        ty: &Type,
        target: ClassId,
        seen_type_vars: &mut HashSet<TypeVarId>,
    ) -> Option<Type> {
        match ty {
            // Nullability does not change which classifiers are reachable.
            Type::Nullable(base) | Type::DefinitelyNonNull(base) => {
                return inner(env, base, target, seen_type_vars);
            }
            Type::TypeVar(id) => {
                if !seen_type_vars.insert(*id) {
                    return None;
                }
                let found = env
                    .type_param(*id)
                    .and_then(|tp| tp.upper_bound.clone())
                    .and_then(|bound| inner(env, &bound, target, seen_type_vars));
                seen_type_vars.remove(id);
                return found;
            }
            Type::Class(_) => {}
            Type::Function(_) | Type::Error => return None,
        }

        let Type::Class(ClassType { def, args }) = ty else {
            return None;
        };

        let mut queue: VecDeque<Type> = VecDeque::new();
        let mut seen: HashSet<ClassId> = HashSet::new();
        queue.push_back(Type::class(*def, args.clone()));

        while let Some(current) = queue.pop_front() {
            let Type::Class(ClassType { def, args }) = current.clone() else {
                continue;
            };
            if !seen.insert(def) {
                continue;
            }

            if def == target {
                return Some(current);
            }

            let Some(class_def) = env.class(def) else {
                continue;
            };

            let subst = zip_substitution(&class_def.type_params, &args);

            let mut pushed_any = false;
            for sup in &class_def.super_types {
                let sup = substitute(sup, &subst);
                if let Type::Class(ClassType { def, .. }) = &sup {
                    pushed_any |= *def == env.well_known().any;
                    queue.push_back(sup);
                }
            }

            // `kotlin.Any` is an implicit supertype of everything else.
            if !pushed_any && def != env.well_known().any {
                queue.push_back(Type::class(env.well_known().any, vec![]));
            }
        }

        None
    }

    let mut seen_type_vars = HashSet::new();
    inner(env, ty, target, &mut seen_type_vars)
}

/// The mapping from a class's formal type parameters to the concrete
/// arguments of `instantiation`, ready for [`substitute`].
///
/// Missing arguments (raw or malformed instantiations) map to [`Type::Error`]
/// so downstream substitution stays total and the affected candidate can be
/// filtered out by `contains_error`.
pub fn substitution_for(
    env: &dyn TypeEnv,
    instantiation: &ClassType,
) -> HashMap<TypeVarId, Type> {
    let Some(class_def) = env.class(instantiation.def) else {
        return HashMap::new();
    };

    let mut subst = HashMap::with_capacity(class_def.type_params.len());
    for (idx, formal) in class_def.type_params.iter().copied().enumerate() {
        subst.insert(
            formal,
            instantiation.args.get(idx).cloned().unwrap_or(Type::Error),
        );
    }
    subst
}

/// Best-effort subtype check over the declared hierarchy.
///
/// Generic arguments are compared invariantly, which is all the quick-fix
/// engine needs; use-site variance is left to the compiler proper.
pub fn is_subtype(env: &dyn TypeEnv, a: &Type, b: &Type) -> bool {
    if a == b {
        return true;
    }

    match (a, b) {
        (Type::Error, _) | (_, Type::Error) => false,
        // `T?` on the right accepts both null and non-null lefts.
        (Type::Nullable(ai), Type::Nullable(bi)) => is_subtype(env, ai, bi),
        (_, Type::Nullable(bi)) => is_subtype(env, a, bi),
        (Type::Nullable(_), _) => false,
        (Type::DefinitelyNonNull(ai), _) => {
            let base = match ai.as_ref() {
                Type::Nullable(inner) => inner,
                other => other,
            };
            is_subtype(env, base, b)
        }
        (_, Type::DefinitelyNonNull(_)) => false,
        (Type::TypeVar(id), _) => env
            .type_param(*id)
            .and_then(|tp| tp.upper_bound.clone())
            .is_some_and(|bound| is_subtype(env, &bound, b)),
        (Type::Class(ac), _) if ac.def == env.well_known().nothing => true,
        (_, Type::Class(bc)) if bc.def == env.well_known().any && bc.args.is_empty() => {
            !matches!(a, Type::Nullable(_))
        }
        (Type::Class(_), Type::Class(bc)) => {
            match instantiate_as_supertype(env, a, bc.def) {
                Some(Type::Class(found)) => found.args == bc.args || bc.args.is_empty(),
                _ => false,
            }
        }
        (Type::Function(_), _) | (_, Type::Function(_)) => false,
        (_, Type::TypeVar(_)) => false,
    }
}

fn zip_substitution(formals: &[TypeVarId], args: &[Type]) -> HashMap<TypeVarId, Type> {
    let mut subst = HashMap::with_capacity(formals.len());
    for (idx, formal) in formals.iter().copied().enumerate() {
        subst.insert(formal, args.get(idx).cloned().unwrap_or(Type::Error));
    }
    subst
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClassDef, ClassKind, TypeStore};
    use pretty_assertions::assert_eq;

    fn container_fixture() -> (TypeStore, ClassId, ClassId) {
        let mut store = TypeStore::with_builtins();
        let wk = *store.well_known();

        let container_t = store.add_type_param("T", None);
        let container = {
            let mut def = ClassDef::new("demo.Container", ClassKind::Interface);
            def.type_params = vec![container_t];
            store.add_class(def)
        };

        // class Box<E> : Container<List<E>>
        let box_e = store.add_type_param("E", None);
        let boxed = {
            let mut def = ClassDef::new("demo.Box", ClassKind::Class);
            def.type_params = vec![box_e];
            def.super_types = vec![Type::class(
                container,
                vec![Type::class(wk.list, vec![Type::TypeVar(box_e)])],
            )];
            store.add_class(def)
        };

        (store, container, boxed)
    }

    #[test]
    fn instantiation_rewrites_nested_type_arguments() {
        let (store, container, boxed) = container_fixture();
        let wk = *store.well_known();
        let string = Type::class(wk.string, vec![]);

        let box_string = Type::class(boxed, vec![string.clone()]);
        let found = instantiate_as_supertype(&store, &box_string, container)
            .expect("Box<String> should be viewable as Container");

        assert_eq!(
            found,
            Type::class(container, vec![Type::class(wk.list, vec![string])]),
        );
    }

    #[test]
    fn instantiation_walks_transitive_edges() {
        let (mut store, container, boxed) = container_fixture();
        let wk = *store.well_known();

        // class NamedBox : Box<String>
        let named_box = {
            let mut def = ClassDef::new("demo.NamedBox", ClassKind::Class);
            def.super_types = vec![Type::class(boxed, vec![Type::class(wk.string, vec![])])];
            store.add_class(def)
        };

        let found =
            instantiate_as_supertype(&store, &Type::class(named_box, vec![]), container)
                .expect("NamedBox reaches Container through Box");
        assert_eq!(
            found,
            Type::class(
                container,
                vec![Type::class(wk.list, vec![Type::class(wk.string, vec![])])]
            ),
        );
    }

    #[test]
    fn unrelated_target_yields_none() {
        let (store, _container, boxed) = container_fixture();
        let wk = *store.well_known();

        let box_string = Type::class(boxed, vec![Type::class(wk.string, vec![])]);
        assert_eq!(
            instantiate_as_supertype(&store, &box_string, wk.int_array),
            None
        );
    }

    #[test]
    fn cyclic_hierarchy_terminates() {
        let mut store = TypeStore::with_builtins();

        let a = store.add_class(ClassDef::new("demo.A", ClassKind::Class));
        let b = store.add_class(ClassDef::new("demo.B", ClassKind::Class));
        store
            .class_mut(a)
            .expect("A exists")
            .super_types = vec![Type::class(b, vec![])];
        store
            .class_mut(b)
            .expect("B exists")
            .super_types = vec![Type::class(a, vec![])];

        let wk = *store.well_known();
        assert_eq!(
            instantiate_as_supertype(&store, &Type::class(a, vec![]), wk.string),
            None,
            "malformed cycle must terminate without finding String"
        );
        // Any is still implicitly reachable.
        assert!(instantiate_as_supertype(&store, &Type::class(a, vec![]), wk.any).is_some());
    }

    #[test]
    fn expanding_generic_cycle_terminates() {
        let mut store = TypeStore::with_builtins();
        let wk = *store.well_known();

        // class A<T> : B<List<T>>; class B<T> : A<List<T>>
        // Every step of the walk produces a fresh, deeper instantiation, so
        // termination has to come from visiting each declaration once.
        let a_t = store.add_type_param("T", None);
        let b_t = store.add_type_param("T", None);
        let a = {
            let mut def = ClassDef::new("demo.A", ClassKind::Class);
            def.type_params = vec![a_t];
            store.add_class(def)
        };
        let b = {
            let mut def = ClassDef::new("demo.B", ClassKind::Class);
            def.type_params = vec![b_t];
            store.add_class(def)
        };
        store.class_mut(a).expect("A exists").super_types = vec![Type::class(
            b,
            vec![Type::class(wk.list, vec![Type::TypeVar(a_t)])],
        )];
        store.class_mut(b).expect("B exists").super_types = vec![Type::class(
            a,
            vec![Type::class(wk.list, vec![Type::TypeVar(b_t)])],
        )];

        let a_int = Type::class(a, vec![Type::class(wk.int, vec![])]);
        assert_eq!(instantiate_as_supertype(&store, &a_int, wk.string), None);
        // The first instantiation of B on the walk is still reachable.
        assert_eq!(
            instantiate_as_supertype(&store, &a_int, b),
            Some(Type::class(
                b,
                vec![Type::class(wk.list, vec![Type::class(wk.int, vec![])])]
            )),
        );
    }

    #[test]
    fn substitution_for_maps_formals_to_arguments() {
        let (store, container, boxed) = container_fixture();
        let wk = *store.well_known();
        let string = Type::class(wk.string, vec![]);

        let self_ty = self_type(&store, boxed).expect("Box is declared");
        let inst = match instantiate_as_supertype(&store, &self_ty, container) {
            Some(Type::Class(ct)) => ct,
            other => panic!("expected class instantiation, got {other:?}"),
        };
        let subst = substitution_for(&store, &inst);

        let container_def = store.class(container).expect("Container is declared");
        let formal = container_def.type_params[0];
        let box_formal = store.class(boxed).expect("Box is declared").type_params[0];
        assert_eq!(
            subst.get(&formal),
            Some(&Type::class(wk.list, vec![Type::TypeVar(box_formal)])),
        );

        // Localize through the edge for a concrete subtype instantiation.
        let mut concrete = HashMap::new();
        concrete.insert(box_formal, string.clone());
        let localized = substitute(subst.get(&formal).expect("mapped"), &concrete);
        assert_eq!(localized, Type::class(wk.list, vec![string]));
    }

    #[test]
    fn raw_instantiation_maps_to_error() {
        let (store, container, _boxed) = container_fixture();

        let raw = ClassType {
            def: container,
            args: vec![],
        };
        let subst = substitution_for(&store, &raw);
        assert!(subst.values().all(|t| t.contains_error()));
    }

    #[test]
    fn subtyping_basics() {
        let (store, container, boxed) = container_fixture();
        let wk = *store.well_known();
        let string = Type::class(wk.string, vec![]);

        let box_string = Type::class(boxed, vec![string.clone()]);
        let container_list_string = Type::class(
            container,
            vec![Type::class(wk.list, vec![string.clone()])],
        );

        assert!(is_subtype(&store, &box_string, &container_list_string));
        assert!(is_subtype(&store, &box_string, &Type::class(wk.any, vec![])));
        assert!(is_subtype(
            &store,
            &box_string,
            &Type::nullable(container_list_string.clone())
        ));
        assert!(!is_subtype(
            &store,
            &Type::nullable(box_string.clone()),
            &container_list_string
        ));
        assert!(!is_subtype(&store, &string, &box_string));
    }
}
