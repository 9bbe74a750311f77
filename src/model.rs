//! Entity factories.

use crate::{
    common::key::Key,
    entity::{Descriptor, Entity, Properties},
    getters::Getters,
};

use std::{fmt, sync::Arc};

type Defaults<I, P> = Arc<dyn Fn(I) -> P + Send + Sync>;

/// Factory of the entities of one type.
///
/// Holds the shared [`Descriptor`] and the function filling defaults into
/// construction input. Without defaults the input is the properties.
///
/// ```rust
/// use dynamodb_entity::{
///     common::key::Key,
///     entity::{Descriptor, KeySchema},
///     model::Model,
///     store::memory::MemoryStore,
/// };
/// use serde::{Deserialize, Serialize};
/// use std::sync::Arc;
///
/// #[derive(Clone, Deserialize, Serialize)]
/// struct User {
///     id: String,
///     name: String,
/// }
///
/// let descriptor = Descriptor::new(
///     Arc::new(MemoryStore::new("pk", None)),
///     KeySchema::new(|user: &User| Key::new("pk", format!("User#{}", user.id))),
///     |user: &User| !user.name.is_empty(),
/// );
/// let users = Model::new(descriptor).with_defaults(|name: String| User {
///     id: "1".to_string(),
///     name,
/// });
///
/// let user = users.construct("Jane".to_string());
/// assert_eq!(user.key().to_string(), "pk=User#1");
/// ```
pub struct Model<P, I = P> {
    descriptor: Arc<Descriptor<P>>,
    defaults: Defaults<I, P>,
}

impl<P: Properties> Model<P> {
    /// Factory using construction input verbatim.
    pub fn new(descriptor: Descriptor<P>) -> Self {
        Self {
            descriptor: Arc::new(descriptor),
            defaults: Arc::new(|properties: P| properties),
        }
    }
}

impl<P: Properties, I> Model<P, I> {
    /// Replace how construction input becomes properties.
    pub fn with_defaults<J>(self, defaults: impl Fn(J) -> P + Send + Sync + 'static) -> Model<P, J> {
        Model {
            descriptor: self.descriptor,
            defaults: Arc::new(defaults),
        }
    }

    /// Build an entity in memory. The store is not touched.
    pub fn construct(&self, input: I) -> Entity<P> {
        Entity::new(Arc::clone(&self.descriptor), (self.defaults)(input))
    }

    /// Read operations keyed by query values `Q`.
    pub fn getters<Q>(
        &self,
        partition: impl Fn(&Q) -> Key<String> + Send + Sync + 'static,
        sort: impl Fn(&Q) -> Key<String> + Send + Sync + 'static,
    ) -> Getters<P, Q> {
        Getters::new(Arc::clone(&self.descriptor), partition, sort)
    }

    /// The descriptor shared by every entity this factory builds.
    pub fn descriptor(&self) -> &Arc<Descriptor<P>> {
        &self.descriptor
    }
}

impl<P, I> Clone for Model<P, I> {
    fn clone(&self) -> Self {
        Self {
            descriptor: Arc::clone(&self.descriptor),
            defaults: Arc::clone(&self.defaults),
        }
    }
}

impl<P, I> fmt::Debug for Model<P, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}
