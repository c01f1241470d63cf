//! QuickJS runtime using rquickjs
//!
//! The script must define a global function (default `bullet_effect`) that
//! takes an array of byte values and returns an array of byte values.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use rquickjs::{Context, Ctx, Function, Object, Runtime};

use super::{cached_init, ForeignRuntime};
use crate::config::ScriptConfig;
use crate::core::error::{ForeignError, ForeignResult};
use crate::record::{RECORD_SIZE, SCHEMA_VERSION};

const BUNDLED_SCRIPT: &str = include_str!("../../scripts/bullet_effect.js");

/// Where the script source comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptSource {
    /// `scripts/bullet_effect.js`, compiled into the library
    Bundled,
    File(PathBuf),
    Inline(String),
}

impl ScriptSource {
    fn load(&self) -> Result<String, String> {
        match self {
            ScriptSource::Bundled => Ok(BUNDLED_SCRIPT.to_string()),
            ScriptSource::File(path) => fs::read_to_string(path)
                .map_err(|e| format!("cannot read script {}: {}", path.display(), e)),
            ScriptSource::Inline(code) => Ok(code.clone()),
        }
    }
}

impl fmt::Display for ScriptSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptSource::Bundled => f.write_str("<bundled bullet_effect.js>"),
            ScriptSource::File(path) => write!(f, "{}", path.display()),
            ScriptSource::Inline(_) => f.write_str("<inline script>"),
        }
    }
}

struct ScriptState {
    context: Context,
    #[allow(dead_code)]
    runtime: Runtime,
}

pub struct ScriptRuntime {
    source: ScriptSource,
    entry_point: String,
    state: OnceLock<Result<ScriptState, String>>,
}

impl ScriptRuntime {
    pub fn new(source: ScriptSource, entry_point: impl Into<String>) -> Self {
        Self {
            source,
            entry_point: entry_point.into(),
            state: OnceLock::new(),
        }
    }

    /// Bundled script with the default entry point.
    pub fn bundled() -> Self {
        Self::from_config(&ScriptConfig::default())
    }

    pub fn from_config(config: &ScriptConfig) -> Self {
        let source = match &config.path {
            Some(path) => ScriptSource::File(path.clone()),
            None => ScriptSource::Bundled,
        };
        Self::new(source, config.entry_point.clone())
    }

    pub fn source(&self) -> &ScriptSource {
        &self.source
    }

    fn state(&self) -> ForeignResult<&ScriptState> {
        cached_init(self.state.get_or_init(|| {
            let state = self.init_state();
            match &state {
                Ok(_) => tracing::info!(
                    target: "bridge.foreign",
                    "QuickJS runtime ready: {} ({})",
                    self.source,
                    self.entry_point
                ),
                Err(reason) => tracing::error!(
                    target: "bridge.foreign",
                    "QuickJS runtime failed to initialize: {}",
                    reason
                ),
            }
            state
        }))
    }

    fn init_state(&self) -> Result<ScriptState, String> {
        let code = self.source.load()?;
        let runtime =
            Runtime::new().map_err(|e| format!("failed to create JS runtime: {:?}", e))?;
        let context =
            Context::full(&runtime).map_err(|e| format!("failed to create JS context: {:?}", e))?;

        context.with(|ctx| {
            install_globals(&ctx).map_err(|e| describe(&ctx, e))?;
            ctx.eval::<(), _>(code)
                .map_err(|e| format!("{}: {}", self.source, describe(&ctx, e)))?;
            ctx.globals()
                .get::<_, Function>(self.entry_point.as_str())
                .map(|_| ())
                .map_err(|_| {
                    format!(
                        "{}: entry point '{}' is not a function",
                        self.source, self.entry_point
                    )
                })
        })?;

        Ok(ScriptState { context, runtime })
    }
}

/// `BULLET_SCHEMA_VERSION`, `BULLET_RECORD_SIZE` and a `console` routed to tracing.
fn install_globals(ctx: &Ctx<'_>) -> rquickjs::Result<()> {
    let globals = ctx.globals();
    globals.set("BULLET_SCHEMA_VERSION", i32::from(SCHEMA_VERSION))?;
    globals.set("BULLET_RECORD_SIZE", RECORD_SIZE as i32)?;

    let console = Object::new(ctx.clone())?;
    console.set(
        "log",
        Function::new(ctx.clone(), |msg: String| {
            tracing::info!(target: "script.console", "{}", msg);
        })?,
    )?;
    console.set(
        "warn",
        Function::new(ctx.clone(), |msg: String| {
            tracing::warn!(target: "script.console", "{}", msg);
        })?,
    )?;
    console.set(
        "error",
        Function::new(ctx.clone(), |msg: String| {
            tracing::error!(target: "script.console", "{}", msg);
        })?,
    )?;
    globals.set("console", console)?;
    Ok(())
}

/// Pulls the pending exception message out of the context, if there is one.
fn describe(ctx: &Ctx<'_>, err: rquickjs::Error) -> String {
    if err.is_exception() {
        let caught = ctx.catch();
        if let Some(message) = caught.as_exception().and_then(|e| e.message()) {
            return message;
        }
        return format!("{:?}", caught);
    }
    err.to_string()
}

impl ForeignRuntime for ScriptRuntime {
    fn name(&self) -> &str {
        "quickjs"
    }

    fn initialize(&self) -> ForeignResult<()> {
        self.state().map(|_| ())
    }

    fn transform(&self, snapshot: &[u8]) -> ForeignResult<Vec<u8>> {
        let state = self.state()?;
        let input: Vec<i32> = snapshot.iter().map(|&b| i32::from(b)).collect();

        let output: Vec<i32> = state.context.with(|ctx| {
            let func: Function = ctx
                .globals()
                .get(self.entry_point.as_str())
                .map_err(|e| describe(&ctx, e))?;
            func.call((input,)).map_err(|e| describe(&ctx, e))
        })
        .map_err(|reason| ForeignError::Runtime(format!("{}: {}", self.entry_point, reason)))?;

        output
            .into_iter()
            .map(|v| {
                u8::try_from(v).map_err(|_| {
                    ForeignError::Runtime(format!(
                        "{} returned {} which is not a byte",
                        self.entry_point, v
                    ))
                })
            })
            .collect()
    }

    fn shutdown(&mut self) {
        self.state.take();
    }
}
