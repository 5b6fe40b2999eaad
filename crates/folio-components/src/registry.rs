//! Component registry mapping rendering roles to renderers.
//!
//! The default registry is built once per process and never mutated. Callers
//! customise rendering by merging an override registry on top of it, which
//! produces a new value.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use folio_mdx::{Body, Element, Node};

use crate::api_reference::{ApiReference, API_PAGE};
use crate::builtin::{Callout, Card, Cards};
use crate::code_block::{HighlightedCodeBlock, PlainCodeBlock};
use crate::traits::{RenderError, Renderer};

/// A named extension point in compiled content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    /// Fenced code blocks (`pre`)
    CodeBlock,
    /// `<Callout>`
    Callout,
    /// `<Card>`
    Card,
    /// `<Cards>`
    Cards,
    /// Any other component, looked up by name (e.g. `APIPage`)
    Custom(String),
}

impl Role {
    /// Map a component element name to its role.
    pub fn from_element(name: &str) -> Self {
        match name {
            "Callout" => Self::Callout,
            "Card" => Self::Card,
            "Cards" => Self::Cards,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Role for a custom component name.
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    /// Name used for this role in content.
    pub fn as_str(&self) -> &str {
        match self {
            Self::CodeBlock => "pre",
            Self::Callout => "Callout",
            Self::Card => "Card",
            Self::Cards => "Cards",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur with the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("No renderer registered for role: {0}")]
    MissingRenderer(Role),
}

/// A mapping from roles to renderers.
///
/// A role may be registered with no renderer ([`ComponentRegistry::suppress`]),
/// in which case it resolves to `Ok(None)` and renders nothing. Unregistered
/// roles resolve to [`RegistryError::MissingRenderer`].
#[derive(Clone, Default)]
pub struct ComponentRegistry {
    renderers: HashMap<Role, Option<Arc<dyn Renderer>>>,
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("roles", &self.roles())
            .finish()
    }
}

impl ComponentRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a renderer for a role, replacing any previous entry.
    pub fn with(self, role: Role, renderer: impl Renderer + 'static) -> Self {
        self.with_shared(role, Arc::new(renderer))
    }

    /// Register a shared renderer for a role.
    pub fn with_shared(mut self, role: Role, renderer: Arc<dyn Renderer>) -> Self {
        self.renderers.insert(role, Some(renderer));
        self
    }

    /// Register a role that renders nothing.
    pub fn suppress(mut self, role: Role) -> Self {
        self.renderers.insert(role, None);
        self
    }

    /// Overlay `overrides` on this registry. Entries from `overrides` win.
    pub fn merge(&self, overrides: &ComponentRegistry) -> ComponentRegistry {
        let mut renderers = self.renderers.clone();
        for (role, renderer) in &overrides.renderers {
            renderers.insert(role.clone(), renderer.clone());
        }
        ComponentRegistry { renderers }
    }

    /// Resolve the renderer for a role.
    pub fn resolve(&self, role: &Role) -> Result<Option<&dyn Renderer>, RegistryError> {
        self.renderers
            .get(role)
            .map(|slot| slot.as_deref())
            .ok_or_else(|| RegistryError::MissingRenderer(role.clone()))
    }

    /// Check if a role is registered.
    pub fn contains(&self, role: &Role) -> bool {
        self.renderers.contains_key(role)
    }

    /// Registered roles, sorted.
    pub fn roles(&self) -> Vec<&Role> {
        let mut roles: Vec<_> = self.renderers.keys().collect();
        roles.sort();
        roles
    }

    /// Verify every role used by `body` is registered.
    ///
    /// Reports the first missing role in document order, the same one
    /// rendering would fail on. Components used inline in prose are checked
    /// along with block-level ones.
    pub fn check(&self, body: &Body) -> Result<(), RenderError> {
        fn require(
            registry: &ComponentRegistry,
            role: Role,
            line: usize,
        ) -> Result<(), RenderError> {
            if registry.contains(&role) {
                Ok(())
            } else {
                Err(RenderError::MissingRenderer {
                    role: role.to_string(),
                    line,
                })
            }
        }

        fn element(registry: &ComponentRegistry, el: &Element) -> Result<(), RenderError> {
            require(registry, Role::from_element(&el.name), el.line_number)?;
            walk(registry, &el.children)
        }

        fn walk(registry: &ComponentRegistry, nodes: &[Node]) -> Result<(), RenderError> {
            for node in nodes {
                match node {
                    Node::Markdown(md) => {
                        for el in &md.inline {
                            element(registry, el)?;
                        }
                    }
                    Node::Code(block) => require(registry, Role::CodeBlock, block.line_number)?,
                    Node::Element(el) => element(registry, el)?,
                }
            }
            Ok(())
        }

        walk(self, &body.nodes)
    }
}

/// The process-wide default registry.
pub fn default_registry() -> &'static ComponentRegistry {
    static DEFAULTS: OnceLock<ComponentRegistry> = OnceLock::new();
    DEFAULTS.get_or_init(|| {
        ComponentRegistry::new()
            .with(Role::CodeBlock, PlainCodeBlock)
            .with(Role::Callout, Callout)
            .with(Role::Card, Card)
            .with(Role::Cards, Cards)
    })
}

/// Overrides used on documentation pages: highlighted code blocks and the
/// embedded API reference.
pub fn page_overrides(api: ApiReference) -> ComponentRegistry {
    ComponentRegistry::new()
        .with(Role::CodeBlock, HighlightedCodeBlock)
        .with(Role::custom(API_PAGE), api)
}

/// The registry documentation pages render with.
pub fn page_registry(api: ApiReference) -> ComponentRegistry {
    default_registry().merge(&page_overrides(api))
}
