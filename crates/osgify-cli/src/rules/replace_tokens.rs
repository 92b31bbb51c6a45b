//! `replace-tokens` rule
//!
//! Substitutes `{project.*}` placeholders in file content with descriptor
//! values, so templates can embed the package name, version or output
//! location without hardcoding them.

use osgify_config::tokens::replace_tokens_in_str;

use super::{RuleContext, RuleOutcome, RuleResult};

pub fn run(ctx: &mut RuleContext<'_>) -> RuleResult {
    let out = replace_tokens_in_str(ctx.project, ctx.content);
    if out == ctx.content {
        return Ok(RuleOutcome::Unchanged);
    }

    ctx.log.info("replace-tokens", "Replaced project tokens");
    Ok(RuleOutcome::Replace(out))
}
