//! texshade opens a window showing one image twice: the left pane through the
//! reference shader and the right pane through the shader under test.
//!
//! Startup errors (config, image, shader compile) are reported before any
//! window is created and turn into a non-zero exit status.

mod cli;
mod run;

use anyhow::Result;

fn main() -> Result<()> {
    run::initialise_tracing();
    run::run(cli::parse())
}
