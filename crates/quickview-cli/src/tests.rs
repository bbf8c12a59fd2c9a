use super::*;

#[test]
fn parses_show_command() {
    let cli = Cli::try_parse_from(["quickview", "show", "classic-tee"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Show { ref product, title: false } if product == "classic-tee"
    ));
}

#[test]
fn parses_add_with_repeated_options() {
    let cli = Cli::try_parse_from([
        "quickview",
        "add",
        "classic-tee",
        "--option",
        "Color=Black",
        "--option",
        "Size = Medium",
        "--quantity",
        "2",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Commands::Add {
            product,
            options,
            quantity,
            title,
        } => {
            assert_eq!(product, "classic-tee");
            assert_eq!(
                options,
                vec![
                    ("Color".to_owned(), "Black".to_owned()),
                    ("Size".to_owned(), "Medium".to_owned()),
                ]
            );
            assert_eq!(quantity, 2);
            assert!(!title);
        }
        other => panic!("expected Add, got: {other:?}"),
    }
}

#[test]
fn add_quantity_defaults_to_one() {
    let cli = Cli::try_parse_from(["quickview", "add", "classic-tee"]).unwrap();
    assert!(matches!(cli.command, Commands::Add { quantity: 1, .. }));
}

#[test]
fn rejects_option_without_equals() {
    let result = Cli::try_parse_from(["quickview", "add", "classic-tee", "--option", "Black"]);
    assert!(result.is_err());
}

#[test]
fn rejects_option_with_empty_value() {
    assert!(parse_option_pair("Color=").is_err());
    assert!(parse_option_pair("=Black").is_err());
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["quickview"]).is_err());
}

#[test]
fn title_flag_derives_handle() {
    assert_eq!(product_handle("Soft Winter Jacket", true), "soft-winter-jacket");
    assert_eq!(product_handle("Soft Winter Jacket", false), "Soft Winter Jacket");
}
