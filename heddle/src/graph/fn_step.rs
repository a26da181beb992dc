//! Closure-backed steps and routers.
//!
//! [`FnStep`] and [`FnRouter`] wrap plain synchronous functions so that hand-written logic (and
//! test stubs) can sit in a graph next to compiled components.

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StepError;

use super::{Router, Step};

type StepFn<S> = dyn Fn(S) -> Result<S, StepError> + Send + Sync;
type RouteFn<S> = dyn Fn(&S) -> Result<String, StepError> + Send + Sync;

/// A step backed by a closure `S -> Result<S, StepError>`.
pub struct FnStep<S> {
    name: String,
    f: Arc<StepFn<S>>,
}

impl<S> FnStep<S> {
    pub fn new(
        name: impl Into<String>,
        f: impl Fn(S) -> Result<S, StepError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            f: Arc::new(f),
        }
    }
}

#[async_trait]
impl<S> Step<S> for FnStep<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, state: S) -> Result<S, StepError> {
        (self.f)(state)
    }
}

/// A router backed by a closure `&S -> Result<label, StepError>`.
pub struct FnRouter<S> {
    name: String,
    f: Arc<RouteFn<S>>,
}

impl<S> FnRouter<S> {
    pub fn new(
        name: impl Into<String>,
        f: impl Fn(&S) -> Result<String, StepError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            f: Arc::new(f),
        }
    }
}

#[async_trait]
impl<S> Router<S> for FnRouter<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn route(&self, state: &S) -> Result<String, StepError> {
        (self.f)(state)
    }
}
