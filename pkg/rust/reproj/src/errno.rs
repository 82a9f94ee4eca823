// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use reproj_core::{Backend, Handle};
use reproj_type::errno::{SUCCESS_DESCRIPTION, describe};

/// Description of an engine error code; never empty
///
/// The engine's own text is preferred. Builds without
/// `proj_context_errno_string`, and codes the engine has no text for, fall
/// back to the static table.
pub(crate) fn describe_code(backend: &dyn Backend, ctx: Option<&Handle>, code: i32) -> String {
	if code == 0 {
		return SUCCESS_DESCRIPTION.to_string();
	}
	// SAFETY: `ctx` comes from a live Context, or is the default context
	match unsafe { backend.context_errno_string(ctx, code) } {
		Ok(Some(text)) if !text.trim().is_empty() => text,
		_ => describe(code),
	}
}

/// Errno of `ctx`, or 0 when it cannot be read
pub(crate) fn last_errno(backend: &dyn Backend, ctx: Option<&Handle>) -> i32 {
	// SAFETY: as in describe_code
	unsafe { backend.context_errno(ctx) }.unwrap_or(0)
}
