//! Script command: the viewer routine handed to embedded PDF viewers.

use anyhow::Result;

use super::common::write_output;
use crate::embed;

/// Print the injected routine, or its stylesheet with `--css`.
pub fn print_script(css: bool) -> Result<()> {
    let content = if css {
        embed::css::stylesheet()
    } else {
        embed::pdf::handler_script()
    };
    write_output(None, &format!("{content}\n"))
}
