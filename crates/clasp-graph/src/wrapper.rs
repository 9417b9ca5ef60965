//! Module wrapper templates.
//!
//! Every output module can be wrapped by the downstream compiler. A wrapper is
//! either left to the defaults, given as a template string, or produced by a
//! callback. Templates use `%placeholder%` markers which are substituted from
//! a [`WrapperContext`] when the wrapper is rendered.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Wrapper for child modules without a global scope.
pub const MODULE_WRAPPER: &str = "%source%\n//# sourceURL=%productionUri%%name%.js";

/// Wrapper for child modules when a global scope name is configured.
pub const MODULE_WRAPPER_WITH_SCOPE: &str = "(function(%renamePrefixNamespace%){%source%})(%globalScopeName%);\n//# sourceURL=%productionUri%%name%.js";

/// Wrapper for the root module without a global scope.
pub const ROOT_MODULE_WRAPPER: &str = "MODULE_INFO=%moduleInfo%;\nMODULE_URIS=%moduleUris%;\nMODULE_USE_DEBUG_MODE=false;\n%source%";

/// Wrapper for the root module when a global scope name is configured.
pub const ROOT_MODULE_WRAPPER_WITH_SCOPE: &str = "MODULE_INFO=%moduleInfo%;\nMODULE_URIS=%moduleUris%;\nMODULE_USE_DEBUG_MODE=false;\n%globalScopeName%={};\n(function(%renamePrefixNamespace%){%source%})(%globalScopeName%);";

/// Default value for `%renamePrefixNamespace%`.
pub const DEFAULT_RENAME_PREFIX_NAMESPACE: &str = "z";

/// Callback that produces a wrapper template for one module.
pub type WrapperFn = Arc<dyn Fn(&WrapperContext<'_>) -> String + Send + Sync>;

/// How a module's output is wrapped.
#[derive(Clone, Default)]
pub enum Wrapper {
    /// Use the default template for the module's position in the tree.
    #[default]
    None,
    /// A template string with `%placeholder%` markers.
    Template(String),
    /// A callback returning a template string.
    Generator(WrapperFn),
}

impl Wrapper {
    pub fn template(template: impl Into<String>) -> Self {
        Self::Template(template.into())
    }

    pub fn generator<F>(f: F) -> Self
    where
        F: Fn(&WrapperContext<'_>) -> String + Send + Sync + 'static,
    {
        Self::Generator(Arc::new(f))
    }

    /// The unsubstituted template for `ctx`.
    pub fn template_for<'a>(&'a self, ctx: &WrapperContext<'_>) -> Cow<'a, str> {
        match self {
            Self::None => Cow::Borrowed(default_template(ctx)),
            Self::Template(template) => Cow::Borrowed(template.as_str()),
            Self::Generator(f) => Cow::Owned(f(ctx)),
        }
    }

    /// Render the wrapper for `ctx` with every placeholder substituted.
    ///
    /// `%source%` becomes `%s`, the marker the compiler replaces with the
    /// module body.
    pub fn render(&self, ctx: &WrapperContext<'_>) -> String {
        substitute(&self.template_for(ctx), ctx)
    }
}

impl fmt::Debug for Wrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Template(template) => f.debug_tuple("Template").field(template).finish(),
            Self::Generator(_) => f.write_str("Generator(..)"),
        }
    }
}

/// Build-wide values shared by every wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapperOptions {
    pub production_uri: String,
    pub global_scope_name: Option<String>,
    pub rename_prefix_namespace: String,
}

impl Default for WrapperOptions {
    fn default() -> Self {
        Self {
            production_uri: String::new(),
            global_scope_name: None,
            rename_prefix_namespace: DEFAULT_RENAME_PREFIX_NAMESPACE.to_string(),
        }
    }
}

/// Everything a wrapper can refer to while rendering one module.
#[derive(Debug, Clone, Copy)]
pub struct WrapperContext<'a> {
    pub name: &'a str,
    pub parent: Option<&'a str>,
    pub options: &'a WrapperOptions,
    /// JSON object of `name -> [parent]` for the whole tree.
    pub module_info: &'a str,
    /// JSON object of `name -> uri` for the whole tree.
    pub module_uris: &'a str,
}

impl WrapperContext<'_> {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

fn default_template(ctx: &WrapperContext<'_>) -> &'static str {
    match (ctx.options.global_scope_name.is_some(), ctx.is_root()) {
        (true, true) => ROOT_MODULE_WRAPPER_WITH_SCOPE,
        (true, false) => MODULE_WRAPPER_WITH_SCOPE,
        (false, true) => ROOT_MODULE_WRAPPER,
        (false, false) => MODULE_WRAPPER,
    }
}

fn substitute(template: &str, ctx: &WrapperContext<'_>) -> String {
    let scope = ctx.options.global_scope_name.as_deref().unwrap_or_default();
    template
        .replace("%globalScopeName%", scope)
        .replace("%moduleInfo%", ctx.module_info)
        .replace("%moduleUris%", ctx.module_uris)
        .replace("%name%", ctx.name)
        .replace("%productionUri%", &ctx.options.production_uri)
        .replace("%renamePrefixNamespace%", &ctx.options.rename_prefix_namespace)
        .replace("%source%", "%s")
}
