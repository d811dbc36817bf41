use std::collections::HashMap;

use crate::{
    ClassDef, ClassId, ClassKind, Type, TypeEnv, TypeParamDef, TypeVarId, WellKnownTypes,
};

/// In-memory declaration table implementing [`TypeEnv`].
///
/// The host language server populates one of these from its resolved model;
/// tests build small fixtures by hand.
#[derive(Debug, Clone)]
pub struct TypeStore {
    classes: Vec<ClassDef>,
    type_params: Vec<TypeParamDef>,
    by_name: HashMap<String, ClassId>,
    well_known: WellKnownTypes,
}

impl TypeStore {
    /// A store seeded with the Kotlin builtins the engine consults.
    pub fn with_builtins() -> Self {
        let mut store = Self {
            classes: Vec::new(),
            type_params: Vec::new(),
            by_name: HashMap::new(),
            // Placeholder, replaced below once the builtin ids exist.
            well_known: WellKnownTypes {
                any: ClassId(0),
                unit: ClassId(0),
                nothing: ClassId(0),
                string: ClassId(0),
                int: ClassId(0),
                boolean: ClassId(0),
                list: ClassId(0),
                array: ClassId(0),
                int_array: ClassId(0),
            },
        };

        let builtin = |store: &mut TypeStore, name: &str, kind: ClassKind| {
            let mut def = ClassDef::new(name, kind);
            def.is_editable = false;
            store.add_class(def)
        };

        let any = builtin(&mut store, "kotlin.Any", ClassKind::Class);
        let unit = builtin(&mut store, "kotlin.Unit", ClassKind::Object);
        let nothing = builtin(&mut store, "kotlin.Nothing", ClassKind::Class);
        let string = builtin(&mut store, "kotlin.String", ClassKind::Class);
        let int = builtin(&mut store, "kotlin.Int", ClassKind::Class);
        let boolean = builtin(&mut store, "kotlin.Boolean", ClassKind::Class);
        let int_array = builtin(&mut store, "kotlin.IntArray", ClassKind::Class);

        let list_t = store.add_type_param("T", None);
        let list = {
            let mut def = ClassDef::new("kotlin.collections.List", ClassKind::Interface);
            def.type_params = vec![list_t];
            def.is_editable = false;
            store.add_class(def)
        };

        let array_t = store.add_type_param("T", None);
        let array = {
            let mut def = ClassDef::new("kotlin.Array", ClassKind::Class);
            def.type_params = vec![array_t];
            def.is_editable = false;
            store.add_class(def)
        };

        store.well_known = WellKnownTypes {
            any,
            unit,
            nothing,
            string,
            int,
            boolean,
            list,
            array,
            int_array,
        };
        store
    }

    pub fn add_class(&mut self, def: ClassDef) -> ClassId {
        let id = ClassId(self.classes.len() as u32);
        self.by_name.insert(def.name.clone(), id);
        self.classes.push(def);
        id
    }

    pub fn add_type_param(&mut self, name: &str, upper_bound: Option<Type>) -> TypeVarId {
        let id = TypeVarId(self.type_params.len() as u32);
        self.type_params.push(TypeParamDef {
            name: name.to_string(),
            upper_bound,
        });
        id
    }

    pub fn class_mut(&mut self, id: ClassId) -> Option<&mut ClassDef> {
        self.classes.get_mut(id.0 as usize)
    }

    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }
}

impl TypeEnv for TypeStore {
    fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.get(id.0 as usize)
    }

    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef> {
        self.type_params.get(id.0 as usize)
    }

    fn lookup_class(&self, name: &str) -> Option<ClassId> {
        self.class_id(name)
    }

    fn well_known(&self) -> &WellKnownTypes {
        &self.well_known
    }
}
