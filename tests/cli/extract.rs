use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::CliTest;

const INDEX: &str = "\
!!!
%html
  %body
    %h1 Welcome to the shop
    = link_to 'Browse products', products_path, class: 'btn'
    -# TODO: banner
    %p
      Free shipping on all orders
";

const INDEX_EXTRACTED: &str = "\
!!!
%html
  %body
    %h1= t('.welcome_to_the_shop')
    = link_to t('.browse_products'), products_path, class: 'btn'
    -# TODO: banner
    %p
      = t('.free_shipping_on_all_orders')
";

#[test]
fn test_extract_directory() -> Result<()> {
    let test = CliTest::with_file("app/views/home/index.html.haml", INDEX)?;
    test.write_file("app/views/users/_form.html.haml", "%label Name\n")?;

    let output = test.extract_command("app/views").output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains(
        "Extracted 4 texts from 2 templates into config/locales/en.json (4 keys added, 0 updated)"
    ));

    assert_eq!(test.read_file("app/views/home/index.html.haml")?, INDEX_EXTRACTED);
    assert_eq!(test.read_file("app/views/users/_form.html.haml")?, "%label= t('.name')\n");
    assert_eq!(
        test.read_json("config/locales/en.json")?,
        json!({
            "en": {
                "home": {
                    "index": {
                        "welcome_to_the_shop": "Welcome to the shop",
                        "browse_products": "Browse products",
                        "free_shipping_on_all_orders": "Free shipping on all orders"
                    }
                },
                "users": {
                    "form": {
                        "name": "Name"
                    }
                }
            }
        })
    );

    Ok(())
}

#[test]
fn test_extract_is_idempotent() -> Result<()> {
    let test = CliTest::with_file("app/views/home/index.html.haml", INDEX)?;

    test.extract_command("app/views").output()?;
    let catalog = test.read_file("config/locales/en.json")?;

    let output = test.extract_command("app/views").output()?;

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Extracted 0 texts from 1 template"));
    assert_eq!(test.read_file("app/views/home/index.html.haml")?, INDEX_EXTRACTED);
    assert_eq!(test.read_file("config/locales/en.json")?, catalog);

    Ok(())
}

#[test]
fn test_extract_stdout_mode() -> Result<()> {
    let test = CliTest::with_file("app/views/home/index.html.haml", INDEX)?;

    let output = test
        .extract_command("app/views/home/index.html.haml")
        .args(["--output-mode", "stdout"])
        .output()?;

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), INDEX_EXTRACTED);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Extracted 3 texts"));
    assert_eq!(test.read_file("app/views/home/index.html.haml")?, INDEX);
    assert!(!test.root().join("config/locales/en.json").exists());

    Ok(())
}

#[test]
fn test_extract_dump_mode_from_config() -> Result<()> {
    let test = CliTest::with_file("app/views/home/index.html.haml", "%p Hello World\n")?;
    test.write_file(
        ".hamlkeyrc.json",
        r#"{ "outputMode": "dump", "locale": "fr", "catalogPath": "locales/fr.json" }"#,
    )?;

    let output = test.extract_command("app/views").output()?;

    assert!(output.status.success());
    assert_eq!(test.read_file("app/views/home/index.html.haml")?, "%p Hello World\n");
    assert_eq!(
        test.read_file("app/views/home/index.html.haml.i18n-extractor.haml")?,
        "%p= t('.hello_world')\n"
    );
    assert_eq!(
        test.read_json("locales/fr.json")?["fr"]["home"]["index"]["hello_world"],
        "Hello World"
    );

    Ok(())
}

#[test]
fn test_extract_continues_after_invalid_template() -> Result<()> {
    let test = CliTest::with_file("app/views/a/broken.html.haml", "%p Hi\n      %span Deep\n")?;
    test.write_file("app/views/b/fine.html.haml", "%p Fine\n")?;

    let output = test.extract_command("app/views").output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("broken.html.haml"));
    assert!(stdout.contains("invalid HAML syntax"));
    assert_eq!(test.read_file("app/views/a/broken.html.haml")?, "%p Hi\n      %span Deep\n");
    assert_eq!(test.read_file("app/views/b/fine.html.haml")?, "%p= t('.fine')\n");

    Ok(())
}

#[test]
fn test_extract_missing_target() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.extract_command("app/views").output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("not a directory: app/views"));

    Ok(())
}

#[test]
fn test_extract_invalid_config() -> Result<()> {
    let test = CliTest::with_file("app/views/home/index.html.haml", "%p Hi\n")?;
    test.write_file(".hamlkeyrc.json", r#"{ "ignores": ["[broken"] }"#)?;

    let output = test.extract_command("app/views").output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid glob pattern in 'ignores'"));
    assert_eq!(test.read_file("app/views/home/index.html.haml")?, "%p Hi\n");

    Ok(())
}

#[test]
fn test_interactive_answers() -> Result<()> {
    let test = CliTest::with_file(
        "app/views/home/index.html.haml",
        "%h1 Title\n%p Keep me\n%p Tag me\n%p Later\n%p Never asked\n",
    )?;

    // replace, decline, tag, next file
    let mut cmd = test.extract_command("app/views");
    cmd.arg("--interactive");
    let output = test.run_with_input(cmd, "y\nn\nt\nN\n")?;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        test.read_file("app/views/home/index.html.haml")?,
        "%h1= t('.title')\n%p Keep me\n%p Tag me\n%p Later\n%p Never asked\n"
    );
    assert_eq!(
        test.read_file(".hamlkey-exclusions")?,
        "app/views/home/index.html.haml:3\n"
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("%p Keep me"));
    assert!(!stdout.contains("%p Never asked"));
    assert!(stdout.contains("unchanged from line 4"));

    Ok(())
}

#[test]
fn test_tagged_line_is_skipped_on_next_run() -> Result<()> {
    let test = CliTest::with_file("app/views/home/index.html.haml", "%p Legal notice\n%p Hello\n")?;
    test.write_file(".hamlkey-exclusions", "app/views/home/index.html.haml:1\n")?;

    let output = test.extract_command("./app/views").output()?;

    assert!(output.status.success());
    assert_eq!(
        test.read_file("app/views/home/index.html.haml")?,
        "%p Legal notice\n%p= t('.hello')\n"
    );

    Ok(())
}

#[test]
fn test_interactive_rejects_stdout_mode() -> Result<()> {
    let test = CliTest::with_file("app/views/home/index.html.haml", "%p Hi\n")?;

    let output = test
        .extract_command("app/views")
        .args(["-i", "--output-mode", "stdout"])
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(test.read_file("app/views/home/index.html.haml")?, "%p Hi\n");

    Ok(())
}

#[test]
fn test_help_lists_commands() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("--help").output()?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("extract"));
    assert!(stdout.contains("init"));

    Ok(())
}

#[test]
fn test_tagged_line_survives_other_path_spelling() -> Result<()> {
    let test = CliTest::with_file("app/views/home/index.html.haml", "%p Legal notice\n")?;

    let mut cmd = test.extract_command("app/views");
    cmd.arg("--interactive");
    test.run_with_input(cmd, "t\n")?;
    assert_eq!(
        test.read_file(".hamlkey-exclusions")?,
        "app/views/home/index.html.haml:1\n"
    );

    let mut cmd = test.extract_command("./app/views/home/index.html.haml");
    cmd.arg("--interactive");
    let output = test.run_with_input(cmd, "y\n")?;

    assert!(output.status.success());
    assert!(!String::from_utf8_lossy(&output.stdout).contains("Legal notice"));
    assert_eq!(test.read_file("app/views/home/index.html.haml")?, "%p Legal notice\n");
    assert_eq!(
        test.read_file(".hamlkey-exclusions")?,
        "app/views/home/index.html.haml:1\n"
    );

    Ok(())
}

#[test]
fn test_multiline_constructs_are_kept_intact() -> Result<()> {
    let source = "\
%nav
  %a{href: '/',
     title: 'Home'} Home page
  = link_to \"Add to cart\",
    cart_path, class: \"btn\"
";
    let test = CliTest::with_file("app/views/shop/index.html.haml", source)?;

    let output = test.extract_command("app/views").output()?;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        test.read_file("app/views/shop/index.html.haml")?,
        "\
%nav
  %a{href: '/',
     title: 'Home'}= t('.home_page')
  = link_to t('.add_to_cart'),
    cart_path, class: \"btn\"
"
    );

    Ok(())
}
