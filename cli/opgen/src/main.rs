//! opgen CLI — generates the IR operator tables from the operator spec and
//! patches them into the compiler sources.

mod commands;
mod manifest;
mod pipeline;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use manifest::{OpgenManifest, MANIFEST_FILE};

#[derive(Parser)]
#[command(name = "opgen", version, about = "IR operator table generator")]
struct Cli {
    /// Path to opgen.toml (default: search upward from the current directory)
    #[arg(long, global = true)]
    manifest: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a template opgen.toml into the current directory
    Init {
        /// Project name
        name: String,
    },
    /// Regenerate the operator tables and patch the target files
    Generate {
        /// Report what would be patched without writing
        #[arg(long)]
        dry_run: bool,
        /// Log diagnostics and echo every generated block
        #[arg(long)]
        debug: bool,
    },
    /// Exit non-zero if any target file is out of date
    Check {
        /// Log diagnostics
        #[arg(long)]
        debug: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Init { name } => {
            init_tracing(false);
            commands::init::run(&cwd, &name)
        }

        Commands::Generate { dry_run, debug } => {
            let (manifest, project_dir) = load_manifest(cli.manifest.as_deref(), &cwd)?;
            let debug = debug || manifest.run.debug;
            init_tracing(debug);
            commands::generate::run(
                &project_dir,
                &manifest,
                dry_run || manifest.run.dry_run,
                debug,
            )
        }

        Commands::Check { debug } => {
            let (manifest, project_dir) = load_manifest(cli.manifest.as_deref(), &cwd)?;
            init_tracing(debug || manifest.run.debug);
            commands::check::run(&project_dir, &manifest)
        }
    }
}

/// Load the manifest given on the command line, or search upward from `cwd`.
fn load_manifest(explicit: Option<&Path>, cwd: &Path) -> anyhow::Result<(OpgenManifest, PathBuf)> {
    if let Some(path) = explicit {
        let path = cwd.join(path);
        let manifest = OpgenManifest::load(&path)?;
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.to_path_buf());
        return Ok((manifest, dir));
    }
    match OpgenManifest::find_and_load(cwd)? {
        Some((manifest, dir)) => Ok((manifest, dir)),
        None => anyhow::bail!("no {MANIFEST_FILE} found (run `opgen init` first)"),
    }
}

/// Log to stderr. `RUST_LOG` wins unless `debug` is set.
fn init_tracing(debug: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::fs;

    use pretty_assertions::assert_eq;

    /// Copy the fixture project into a fresh temp dir.
    fn fixture_project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let src = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/co");
        copy_dir(&src, dir.path());
        dir
    }

    fn copy_dir(from: &Path, to: &Path) {
        fs::create_dir_all(to).unwrap();
        for entry in fs::read_dir(from).unwrap() {
            let entry = entry.unwrap();
            let target = to.join(entry.file_name());
            if entry.file_type().unwrap().is_dir() {
                copy_dir(&entry.path(), &target);
            } else {
                fs::copy(entry.path(), &target).unwrap();
            }
        }
    }

    fn load(dir: &Path) -> (OpgenManifest, PathBuf) {
        OpgenManifest::find_and_load(dir).unwrap().unwrap()
    }

    /// generate → check → generate again is a no-op.
    #[test]
    fn generate_check_regenerate_workflow() {
        let dir = fixture_project();
        let (manifest, project_dir) = load(dir.path());

        assert!(commands::check::run(&project_dir, &manifest).is_err());

        commands::generate::run(&project_dir, &manifest, false, false).unwrap();
        let header = fs::read_to_string(project_dir.join("src/ir/op.h")).unwrap();
        let source = fs::read_to_string(project_dir.join("src/ir/op.c")).unwrap();

        commands::check::run(&project_dir, &manifest).unwrap();

        commands::generate::run(&project_dir, &manifest, false, false).unwrap();
        assert_eq!(fs::read_to_string(project_dir.join("src/ir/op.h")).unwrap(), header);
        assert_eq!(fs::read_to_string(project_dir.join("src/ir/op.c")).unwrap(), source);
    }

    #[test]
    fn generated_header_contents() {
        let dir = fixture_project();
        let (manifest, project_dir) = load(dir.path());
        commands::generate::run(&project_dir, &manifest, false, false).unwrap();

        let header = fs::read_to_string(project_dir.join("src/ir/op.h")).unwrap();
        assert!(header.starts_with("#pragma once\n#include \"../types.h\"\n\ntypedef enum IROp {\n"));
        assert!(header.contains("  // generated by opgen from src/ir/arch_base.lisp\n  OpNil,\n"));
        assert!(header.contains(
            "  OpPhi,\t// select an argument based on which predecessor block we came from\n"
        ));
        assert!(header.contains("  //\n  // Constant values. Stored in aux.\n  OpConstBool,\n"));
        assert!(header.contains("  OpNegI32,\t// -arg0\n"));
        assert!(header.contains("  OpLessU32,\n\n  Op_MAX\n} IROp;\n"));
        assert!(header.contains("  IROpFlagConstant          = 1 << 1 ,// true if the value is a constant. Value in aux\n"));
        assert!(header.ends_with("} IROpFlag;\n\ntypedef struct IROpDescr {\n  TypeCode outputType;\n  int      flags;\n} IROpDescr;\n"));
    }

    #[test]
    fn generated_source_contents() {
        let dir = fixture_project();
        let (manifest, project_dir) = load(dir.path());
        commands::generate::run(&project_dir, &manifest, false, false).unwrap();

        let source = fs::read_to_string(project_dir.join("src/ir/op.c")).unwrap();
        assert!(source.contains("const char* const IROpNames[Op_MAX] = {\n  // Do not edit. Generated by opgen\n  \"Nil\",\n  \"Phi\",\n"));
        assert!(source.contains("  /* TypeCode_int32   = */ OpConstI32,\n"));
        assert!(source.contains("  /* TypeCode_uint8   = */ OpConstI8,\n"));
        assert!(source.contains("  { TypeCode_int32, IROpFlagCommutative | IROpFlagResultInArg0 },\n"));
        assert!(source.contains("  { TypeCode_bool, IROpFlagNone },\n"));
        assert!(source.contains("\n          case TPlus  : return OpAddI32  ;// i32 i32 -> i32\n"));
        assert!(source.contains("\n        case TypeCode_nil: switch (tok) {\n          case TMinus : return OpNegI32 ;// i32 -> i32\n"));
        assert!(source.ends_with("    //!END_AST_TO_IR_OP_SWITCHES\n  return OpNil;\n}\n"));
    }

    #[test]
    fn dry_run_leaves_files_untouched() {
        let dir = fixture_project();
        let (manifest, project_dir) = load(dir.path());
        let before = fs::read_to_string(project_dir.join("src/ir/op.c")).unwrap();

        commands::generate::run(&project_dir, &manifest, true, false).unwrap();
        assert_eq!(fs::read_to_string(project_dir.join("src/ir/op.c")).unwrap(), before);
    }

    #[test]
    fn unknown_flag_aborts_before_any_write() {
        let dir = fixture_project();
        let (manifest, project_dir) = load(dir.path());
        let spec = project_dir.join("src/ir/arch_base.lisp");
        let text = fs::read_to_string(&spec).unwrap().replace("Commutative ResultInArg0", "Commutativ");
        fs::write(&spec, text).unwrap();
        let header = fs::read_to_string(project_dir.join("src/ir/op.h")).unwrap();

        let err = commands::generate::run(&project_dir, &manifest, false, false).unwrap_err();
        assert!(format!("{err:#}").contains("Commutativ"));
        assert_eq!(fs::read_to_string(project_dir.join("src/ir/op.h")).unwrap(), header);
    }

    #[test]
    fn end_sentinel_in_comment_blocks_every_write() {
        let dir = fixture_project();
        let (manifest, project_dir) = load(dir.path());
        let spec = project_dir.join("src/ir/arch_base.lisp");
        let text = fs::read_to_string(&spec)
            .unwrap()
            .replace("(ops\n", "(ops\n  ; old layout ended with } IROp; here\n");
        fs::write(&spec, text).unwrap();
        let header = fs::read_to_string(project_dir.join("src/ir/op.h")).unwrap();
        let source = fs::read_to_string(project_dir.join("src/ir/op.c")).unwrap();

        for _ in 0..2 {
            let err = commands::generate::run(&project_dir, &manifest, false, false).unwrap_err();
            assert!(format!("{err:#}").contains("appears early"));
        }
        assert_eq!(fs::read_to_string(project_dir.join("src/ir/op.h")).unwrap(), header);
        assert_eq!(fs::read_to_string(project_dir.join("src/ir/op.c")).unwrap(), source);
    }

    #[test]
    fn missing_sentinel_in_source_blocks_header_write() {
        let dir = fixture_project();
        let (manifest, project_dir) = load(dir.path());
        let source = project_dir.join("src/ir/op.c");
        let text = fs::read_to_string(&source).unwrap().replace("//!END_AST_TO_IR_OP_SWITCHES", "");
        fs::write(&source, text).unwrap();
        let header = fs::read_to_string(project_dir.join("src/ir/op.h")).unwrap();

        assert!(commands::generate::run(&project_dir, &manifest, false, false).is_err());
        assert_eq!(fs::read_to_string(project_dir.join("src/ir/op.h")).unwrap(), header);
    }

    #[test]
    fn explicit_manifest_path() {
        let dir = fixture_project();
        let elsewhere = tempfile::tempdir().unwrap();
        let (manifest, project_dir) =
            load_manifest(Some(dir.path().join(MANIFEST_FILE).as_path()), elsewhere.path()).unwrap();
        assert_eq!(manifest.project.name, "co");
        assert_eq!(project_dir, dir.path());
    }

    #[test]
    fn missing_manifest_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_manifest(None, dir.path()).unwrap_err();
        assert!(err.to_string().contains("no opgen.toml found"));
    }
}
