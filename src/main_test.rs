use super::*;

#[test]
fn localized_failures_are_not_printed_twice() {
    assert!(CliError::Session(SessionError::Rejected("Invalid credentials".to_owned())).already_reported());
    assert!(CliError::NotFound("/nope".to_owned()).already_reported());
}

#[test]
fn other_failures_are_printed_at_exit() {
    assert!(!CliError::Api(ApiError::Transport("connection refused".to_owned())).already_reported());
    assert!(!CliError::InvalidParam("page".to_owned()).already_reported());
    assert!(!CliError::RedirectLoop("/".to_owned()).already_reported());
}

#[test]
fn error_display_is_the_message_not_debug() {
    let err = CliError::Api(ApiError::Transport("connection refused".to_owned()));
    assert!(!err.to_string().contains("Transport("));
}

#[test]
fn parse_params_splits_key_value_pairs() {
    let params = parse_params(&["page=2".to_owned(), "filter=a=b".to_owned()]).unwrap();
    assert_eq!(params, vec![("page".to_owned(), "2".to_owned()), ("filter".to_owned(), "a=b".to_owned())]);
}

#[test]
fn parse_params_rejects_missing_key() {
    assert!(matches!(parse_params(&["=2".to_owned()]), Err(CliError::InvalidParam(_))));
    assert!(matches!(parse_params(&["page".to_owned()]), Err(CliError::InvalidParam(_))));
}

#[test]
fn cli_parses_role_crud_and_public() {
    let cli = Cli::try_parse_from(["cms-admin", "api", "roles", "public"]).unwrap();
    assert!(matches!(cli.command, Command::Api(ApiCommand { command: ApiSubcommand::Roles { action: RoleAction::Public } })));
    let cli = Cli::try_parse_from(["cms-admin", "api", "roles", "get", "3"]).unwrap();
    assert!(matches!(
        cli.command,
        Command::Api(ApiCommand { command: ApiSubcommand::Roles { action: RoleAction::Crud(CrudAction::Get { .. }) } })
    ));
}
