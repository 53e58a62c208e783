/*
 * lua/deadline.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Wall-clock limit for a running document.
//!
//! An instruction-count hook on every thread raises once the deadline has
//! passed, and keeps raising on each later check. Protected calls would
//! otherwise swallow that error, so `pcall`, `xpcall` and `coroutine.resume`
//! are wrapped to raise it again when they return after the deadline.

use std::time::{Duration, Instant};

use mlua::{Error, HookTriggers, Lua, MultiValue, Result, VmState};

/// Instructions between deadline checks.
const HOOK_INTERVAL: u32 = 1000;

const GUARDS: &str = r#"
local expired = ...
local raw_pcall, raw_xpcall = pcall, xpcall
pcall = function(...) return expired(raw_pcall(...)) end
xpcall = function(...) return expired(raw_xpcall(...)) end
if coroutine then
  local raw_resume = coroutine.resume
  coroutine.resume = function(...) return expired(raw_resume(...)) end
end
"#;

#[derive(Debug, Clone, Copy)]
struct Deadline {
    at: Instant,
    limit: Duration,
}

impl Deadline {
    fn check(&self) -> Result<()> {
        if Instant::now() >= self.at {
            Err(Error::runtime(format!(
                "execution exceeded the time limit of {} ms",
                self.limit.as_millis()
            )))
        } else {
            Ok(())
        }
    }
}

/// Replace the protected-call functions with deadline-aware versions.
///
/// They pass results through unchanged while no deadline is armed.
pub fn register_deadline_guards(lua: &Lua) -> Result<()> {
    let expired = lua.create_function(|lua, results: MultiValue| {
        let deadline = lua.app_data_ref::<Deadline>().map(|d| *d);
        if let Some(deadline) = deadline {
            deadline.check()?;
        }
        Ok(results)
    })?;
    lua.load(GUARDS)
        .set_name("=deadline")
        .call::<()>(expired)
}

/// Start the clock: from now on every thread of `lua` fails once `limit`
/// has elapsed.
pub fn arm(lua: &Lua, limit: Duration) -> Result<()> {
    let deadline = Deadline {
        at: Instant::now() + limit,
        limit,
    };
    lua.set_app_data(deadline);
    lua.set_global_hook(
        HookTriggers::new().every_nth_instruction(HOOK_INTERVAL),
        move |_lua, _debug| deadline.check().map(|()| VmState::Continue),
    )
}

pub fn disarm(lua: &Lua) {
    lua.remove_global_hook();
    lua.remove_app_data::<Deadline>();
}
