//! Named bean registry.
//!
//! # Spring Equivalent
//! `ApplicationContext` / `ConfigurableListableBeanFactory`
//!
//! Holds the singletons produced at startup (such as the STOMP handler
//! mapping) so that post-startup callbacks can look them up by name and
//! type.

use std::any::{type_name, Any};
use std::fmt;

use super::error::ConfigurationError;

/// Ordered registry of named singletons.
#[derive(Default)]
pub struct ApplicationContext {
    beans: Vec<(String, Box<dyn Any + Send + Sync>)>,
}

impl ApplicationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `bean` under `name`, replacing any bean of the same name.
    pub fn register_bean<T: Any + Send + Sync>(&mut self, name: &str, bean: T) -> &mut Self {
        let boxed: Box<dyn Any + Send + Sync> = Box::new(bean);
        match self.beans.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = boxed,
            None => self.beans.push((name.to_string(), boxed)),
        }
        self
    }

    pub fn contains_bean(&self, name: &str) -> bool {
        self.beans.iter().any(|(n, _)| n == name)
    }

    /// # Errors
    /// `NoSuchBean` when nothing is registered under `name`,
    /// `BeanNotOfRequiredType` when the bean is not a `T`.
    pub fn get_bean<T: Any>(&self, name: &str) -> Result<&T, ConfigurationError> {
        let (_, bean) = self
            .beans
            .iter()
            .find(|(n, _)| n == name)
            .ok_or_else(|| no_such_bean(name))?;
        bean.downcast_ref::<T>()
            .ok_or_else(|| not_of_type::<T>(name))
    }

    pub fn get_bean_mut<T: Any>(&mut self, name: &str) -> Result<&mut T, ConfigurationError> {
        let (_, bean) = self
            .beans
            .iter_mut()
            .find(|(n, _)| n == name)
            .ok_or_else(|| no_such_bean(name))?;
        bean.downcast_mut::<T>()
            .ok_or_else(|| not_of_type::<T>(name))
    }

    /// Takes the bean out of the context. A bean of another type is left in place.
    pub fn remove_bean<T: Any>(&mut self, name: &str) -> Result<T, ConfigurationError> {
        let index = self
            .beans
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| no_such_bean(name))?;
        if !self.beans[index].1.is::<T>() {
            return Err(not_of_type::<T>(name));
        }
        let (_, bean) = self.beans.remove(index);
        bean.downcast::<T>()
            .map(|b| *b)
            .map_err(|_| not_of_type::<T>(name))
    }

    pub fn bean_names(&self) -> impl Iterator<Item = &str> {
        self.beans.iter().map(|(n, _)| n.as_str())
    }
}

impl fmt::Debug for ApplicationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationContext")
            .field("beans", &self.bean_names().collect::<Vec<_>>())
            .finish()
    }
}

fn no_such_bean(name: &str) -> ConfigurationError {
    ConfigurationError::NoSuchBean {
        name: name.to_string(),
    }
}

fn not_of_type<T>(name: &str) -> ConfigurationError {
    ConfigurationError::BeanNotOfRequiredType {
        name: name.to_string(),
        expected: type_name::<T>(),
    }
}
