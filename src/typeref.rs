//! Types that can be named by a value.
//!
//! A [`Value`](crate::Value) holding a type name can be turned into a
//! [`TypeHandle`], and from there into an instance, as long as the type was
//! registered first.
//!
//! ```rust
//! use fluxml::{TypeRegistry, Value};
//!
//! #[derive(Default, Debug, PartialEq)]
//! struct Greeter;
//!
//! let mut registry = TypeRegistry::new();
//! registry.register_as::<Greeter>("greeter");
//!
//! let greeter: Greeter = Value::new("greeter").instantiate(&registry)?;
//! assert_eq!(greeter, Greeter);
//! assert!(Value::new("other").as_type(&registry).is_err());
//! # Ok::<(), fluxml::Error>(())
//! ```
use std::any::{type_name, Any, TypeId};

use ahash::HashMap;

use crate::error::Error;

type Constructor = fn() -> Box<dyn Any>;

fn construct<T: Any + Default>() -> Box<dyn Any> {
    Box::new(T::default())
}

/// A registered type.
#[derive(Debug, Clone)]
pub struct TypeHandle {
    name: String,
    type_id: TypeId,
    constructor: Option<Constructor>,
}

impl TypeHandle {
    /// The name the type was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Whether this handle refers to `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Whether the type can be instantiated.
    pub fn is_constructible(&self) -> bool {
        self.constructor.is_some()
    }

    /// Construct a default instance.
    pub fn instantiate(&self) -> Result<Box<dyn Any>, Error> {
        let constructor = self
            .constructor
            .ok_or_else(|| Error::Instantiation(self.name.clone()))?;
        Ok(constructor())
    }
}

/// The types a value may name, by name.
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    types: HashMap<String, TypeHandle>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type under its full name, as given by
    /// [`std::any::type_name`] (and [`Value::of_type`](crate::Value::of_type)).
    pub fn register<T: Any + Default>(&mut self) -> &mut Self {
        self.register_as::<T>(type_name::<T>())
    }

    /// Register a type under the given name.
    pub fn register_as<T: Any + Default>(&mut self, name: impl Into<String>) -> &mut Self {
        self.insert(name.into(), TypeId::of::<T>(), Some(construct::<T> as Constructor))
    }

    /// Register a type that can be named but not instantiated.
    pub fn register_abstract<T: Any + ?Sized>(&mut self) -> &mut Self {
        self.insert(type_name::<T>().to_string(), TypeId::of::<T>(), None)
    }

    fn insert(
        &mut self,
        name: String,
        type_id: TypeId,
        constructor: Option<Constructor>,
    ) -> &mut Self {
        let handle = TypeHandle {
            name: name.clone(),
            type_id,
            constructor,
        };
        self.types.insert(name, handle);
        self
    }

    pub fn get(&self, name: &str) -> Option<TypeHandle> {
        self.types.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::Value;

    #[derive(Debug, Default)]
    struct Counter {
        count: u32,
    }

    trait Shape {}

    #[test]
    fn test_register_by_type_name() {
        let mut registry = TypeRegistry::new();
        registry.register::<Counter>();
        let handle = Value::of_type::<Counter>().as_type(&registry).unwrap();
        assert!(handle.is::<Counter>());
        assert_eq!(handle.name(), type_name::<Counter>());
    }

    #[test]
    fn test_instantiate() {
        let mut registry = TypeRegistry::new();
        registry.register_as::<Counter>("counter");
        let counter: Counter = Value::new("counter").instantiate(&registry).unwrap();
        assert_eq!(counter.count, 0);
    }

    #[test]
    fn test_instantiate_wrong_type() {
        let mut registry = TypeRegistry::new();
        registry.register_as::<Counter>("counter");
        let err = Value::new("counter")
            .instantiate::<String>(&registry)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Instantiation);
    }

    #[test]
    fn test_abstract_cannot_be_instantiated() {
        let mut registry = TypeRegistry::new();
        registry.register_abstract::<dyn Shape>();
        let handle = Value::of_type::<dyn Shape>().as_type(&registry).unwrap();
        assert!(!handle.is_constructible());
        assert_eq!(
            handle.instantiate().unwrap_err().kind(),
            ErrorKind::Instantiation
        );
    }

    #[test]
    fn test_unknown_type() {
        let registry = TypeRegistry::new();
        assert!(registry.is_empty());
        let err = Value::new("nope::Nope").as_type(&registry).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ClassNotFound);
        let err = Value::absent().as_type(&registry).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }
}
