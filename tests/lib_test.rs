//! Library integration tests.

use rigup::RigupError;

#[test]
fn error_types_are_public() {
    let err = RigupError::UnknownDependency {
        requirement: "yarn".into(),
        dependency: "node".into(),
    };
    assert!(err.to_string().contains("yarn"));
    assert!(err.to_string().contains("node"));
    assert!(err.is_malformed_registry());
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> rigup::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use rigup::cli::{Cli, Commands};

    let cli = Cli::parse_from(["rigup", "run", "--json", "--platform", "windows"]);

    if let Some(Commands::Run(args)) = cli.command {
        assert!(args.json);
        assert_eq!(args.platform, Some(rigup::requirements::Platform::Windows));
    } else {
        panic!("Expected Run command");
    }
}
