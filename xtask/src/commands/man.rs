use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

#[derive(Args, Debug)]
pub struct ManArgs {
    /// Output directory (default: dist/share/man/man1)
    #[arg(long = "out-dir", default_value = "dist/share/man/man1")]
    pub out_dir: PathBuf,
}

pub fn cmd_man(args: ManArgs) -> Result<(), String> {
    let out_dir = crate::workspace_root().join(args.out_dir);
    fs::create_dir_all(&out_dir).map_err(|e| format!("{}: {e}", out_dir.display()))?;

    let cmd = jira::command();
    render_tree(&cmd, "jira", &out_dir)
}

/// Write `<name>.1` for `cmd`, then recurse with `<name>-<sub>` so that
/// `jira issue worklog add` lands in `jira-issue-worklog-add.1`.
fn render_tree(cmd: &clap::Command, name: &str, out_dir: &Path) -> Result<(), String> {
    let man = clap_mangen::Man::new(cmd.clone()).title(name.to_uppercase());
    let mut buffer: Vec<u8> = Vec::new();
    man.render(&mut buffer)
        .map_err(|e| format!("render manpage for {name}: {e}"))?;

    let man_path = out_dir.join(format!("{name}.1"));
    fs::write(&man_path, buffer).map_err(|e| format!("{}: {e}", man_path.display()))?;
    println!("wrote {}", man_path.display());

    for subcommand in cmd.get_subcommands() {
        let child = format!("{name}-{}", subcommand.get_name());
        render_tree(subcommand, &child, out_dir)?;
    }

    Ok(())
}
