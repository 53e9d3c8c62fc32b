//! Grammar tests for the parser.
//!
//! Each test parses a single in-memory `main.c4` and inspects either the
//! resulting workspace tree or the terminal error.

use c4c_core::{
    ModelError,
    identifier::IdentifierString,
    model::{Entity, Identifiable, Workspace},
};

use crate::{
    CachingProvider, Keyword, MemoryLoader, Parser, TokenKind,
    error::{ErrorCode, ExpectationError, ParseError, TokenAtError},
};

fn parse(source: &str) -> Result<Workspace, ParseError> {
    let mut provider =
        CachingProvider::new(MemoryLoader::default().with_source("main.c4", source));
    Parser::run("main.c4", &mut provider)
}

/// Parses a source and panics with the error if it fails.
fn parse_ok(source: &str) -> Workspace {
    parse(source).unwrap_or_else(|err| panic!("expected parse to succeed, got: {err}"))
}

/// Parses a source and returns the error it must fail with.
fn parse_err(source: &str) -> ParseError {
    match parse(source) {
        Ok(workspace) => panic!("expected parse to fail, got: {workspace:?}"),
        Err(err) => err,
    }
}

/// Wraps `body` in a workspace with a model block.
fn in_model(body: &str) -> String {
    format!("workspace {{\n  model {{\n{body}\n  }}\n}}\n")
}

fn expectation(err: ParseError) -> ExpectationError {
    match err {
        ParseError::Expectation(err) => *err,
        other => panic!("expected an expectation error, got {other:?}"),
    }
}

fn id(text: &str) -> IdentifierString {
    IdentifierString::new(text).unwrap()
}

fn find<'w>(workspace: &'w Workspace, text: &str) -> &'w Entity {
    workspace
        .find(&id(text))
        .unwrap_or_else(|| panic!("no entity '{text}'"))
}

const SHOP: &str = r#"workspace 'Shop' 'Online shop' {
  model {
    user = person 'Customer' 'Buys things' 'external, web'
    shop = softwareSystem 'Shop' {
      description `
        Sells things
        to customers
      `
      api = container 'API' 'Serves the shop' 'Rust'
      db = container 'Database' {
        technology 'PostgreSQL'
        url 'https://example.com/db'
      }
      api -> db 'Reads from' 'SQL'
    }
    user -> shop 'Uses'
  }
}
"#;

#[test]
fn test_full_workspace() {
    let workspace = parse_ok(SHOP);
    assert_eq!(workspace.base.name, "Shop");
    assert_eq!(workspace.base.description, "Online shop");
    assert_eq!(workspace.file, "main.c4");
    let root = workspace.id();

    let user = find(&workspace, "user");
    assert_eq!(user.kind(), c4c_core::model::EntityKind::Person);
    assert_eq!(user.base().name, "Customer");
    assert_eq!(user.base().description, "Buys things");
    assert_eq!(user.base().tags, vec!["external", "web"]);
    assert_eq!(user.base().parent, root);

    let shop = find(&workspace, "shop");
    assert_eq!(shop.base().description, "Sells things\nto customers");
    assert_eq!(shop.children().unwrap().len(), 2);

    let api = find(&workspace, "api");
    assert_eq!(api.base().description, "Serves the shop");
    assert_eq!(api.base().technology, "Rust");
    assert_eq!(api.base().parent, Some(id("shop")));

    let db = find(&workspace, "db");
    assert_eq!(db.base().technology, "PostgreSQL");
    assert_eq!(db.base().url, "https://example.com/db");

    let reads = &shop.relationships().unwrap()[0];
    assert_eq!(reads.source_id, id("api"));
    assert_eq!(reads.destination_id, id("db"));
    assert_eq!(reads.base.description, "Reads from");
    assert_eq!(reads.base.technology, "SQL");
    assert_eq!(reads.base.parent, Some(id("shop")));

    let model = workspace.model.as_ref().unwrap();
    assert_eq!(model.relationships.len(), 1);
    assert_eq!(model.relationships[0].source_id, id("user"));
    assert_eq!(model.relationships[0].destination_id, id("shop"));
    assert_eq!(model.relationships[0].base.description, "Uses");
}

#[test]
fn test_synthetic_identifiers() {
    let source = "workspace { model { softwaresystem 'my system' { } } }";
    let workspace = parse_ok(source);

    assert_eq!(workspace.id().unwrap().to_string(), "_workspace00_main.c4");
    let model = workspace.model.as_ref().unwrap();
    let ids: Vec<String> = model.named_entities.ids().map(|id| id.to_string()).collect();
    assert_eq!(ids, vec!["_softwaresystem01_my_system"]);

    assert_eq!(parse_ok(source), workspace);
}

#[test]
fn test_synthetic_identifiers_follow_source_order() {
    let workspace = parse_ok(&in_model(
        "    person ' Jane Doe '\n    shop = softwareSystem 'Shop' {\n      container 'Web App'\n    }",
    ));

    let jane = IdentifierString::synthetic("person", 1, "Jane Doe");
    assert_eq!(jane.to_string(), "_person01_jane_doe");
    assert!(workspace.find(&jane).is_some());

    let web = IdentifierString::synthetic("container", 2, "Web App");
    assert_eq!(find(&workspace, "shop").children().unwrap().ids().next(), Some(&web));
}

#[test]
fn test_duplicate_identifier_rejected() {
    let err = parse_err(&in_model("    api = person 'A'\n    api = person 'B'"));

    assert_eq!(err.code(), ErrorCode::E201);
    assert_eq!(err.to_string(), "redefining identifier api");
    let token = err.token_at_error().unwrap();
    assert!(token.is(TokenKind::Identifier));
    assert_eq!(token.range().start().line(), 4);
}

#[test]
fn test_same_identifier_in_different_scopes() {
    let workspace = parse_ok(&in_model(
        "    one = softwareSystem 'One' {\n      api = container 'A'\n    }\n    two = softwareSystem 'Two' {\n      api = container 'B'\n    }",
    ));
    assert_eq!(find(&workspace, "one").children().unwrap().len(), 1);
    assert_eq!(find(&workspace, "two").children().unwrap().len(), 1);
}

#[test]
fn test_parent_resolves_to_owning_scope() {
    let workspace = parse_ok(&in_model(
        "    a = softwareSystem 'A' {\n      x = container 'AX'\n    }\n    b = softwareSystem 'B' {\n      x = container 'BX' {\n        c = component 'C'\n      }\n    }",
    ));

    let component = find(&workspace, "c");
    assert_eq!(component.base().parent, Some(id("x")));
    let parent = workspace.parent_of(component).unwrap();
    assert_eq!(parent.base().name, "BX");
    assert_eq!(workspace.parent_of(parent).unwrap().base().name, "B");
}

#[test]
fn test_dotted_identifier_rejected() {
    for body in [
        "    sys.web = person 'X'",
        "    a = person 'A'\n    a.b -> a",
        "    a = person 'A'\n    a -> a.b",
    ] {
        let err = parse_err(&in_model(body));
        assert!(
            matches!(
                err,
                ParseError::Model {
                    error: ModelError::InvalidIdentifier(_),
                    ..
                }
            ),
            "{body}: {err:?}"
        );
        assert_eq!(err.code(), ErrorCode::E202);
        assert!(err.token_at_error().unwrap().is(TokenKind::Identifier));
    }
}

#[test]
fn test_single_line_description_kept_verbatim() {
    let workspace = parse_ok("workspace {\n\tdescription '   padded text'\n}");
    assert_eq!(workspace.base.description, "   padded text");
}

#[test]
fn test_multiline_description_dedent() {
    let source = "workspace {\n\tdescription `\n\t\tthis\n\t\tis very hard\n\t\tto test\n\t`\n}";
    let workspace = parse_ok(source);
    assert_eq!(workspace.base.description, "this\nis very hard\nto test");
}

#[test]
fn test_multiline_name_rejected() {
    let err = parse_err("workspace {\n\tname `a\nb`\n}");
    assert!(matches!(err, ParseError::Semantic { .. }));
    assert_eq!(err.to_string(), "multiline string not allowed in this context");
    assert_eq!(err.code(), ErrorCode::E200);
}

#[test]
fn test_tags() {
    let workspace = parse_ok(&in_model(
        "    a = person 'A' {\n      tags 'one' \"two\"\n    }\n    b = person 'B' {\n      tags 'x, y ,, z'\n    }",
    ));
    assert_eq!(find(&workspace, "a").base().tags, vec!["one", "two"]);
    assert_eq!(find(&workspace, "b").base().tags, vec!["x", "y", "z"]);
}

#[test]
fn test_mixed_tag_styles_rejected() {
    for tags in ["'x, y' 'z'", "'z' 'x, y'"] {
        let err = parse_err(&in_model(&format!("    person 'A' {{\n      tags {tags}\n    }}")));
        assert_eq!(
            err.to_string(),
            "mixed comma separated and space separated tags are not allowed"
        );
    }
}

#[test]
fn test_tags_require_a_string() {
    let err = parse_err(&in_model("    person 'A' {\n      tags;\n    }"));
    let err = expectation(err);
    assert_eq!(err.expected_kinds(), [TokenKind::String]);
}

#[test]
fn test_properties() {
    let workspace = parse_ok(
        "workspace {\n  properties {\n    'owner' 'team-a'\n    \"tier\" \"gold\";\n  }\n}\n",
    );
    let properties = &workspace.base.properties;
    assert_eq!(properties["owner"], "team-a");
    assert_eq!(properties["tier"], "gold");
    assert_eq!(properties.keys().collect::<Vec<_>>(), ["owner", "tier"]);
}

#[test]
fn test_duplicate_property_key_rejected() {
    let err = parse_err("workspace {\n  properties {\n    'a' '1'\n    'a' '2'\n  }\n}\n");
    assert_eq!(err.to_string(), "illegal attempt to redefine key a");
    assert_eq!(err.token_at_error().unwrap().range().start().line(), 4);
}

#[test]
fn test_perspectives() {
    let workspace = parse_ok(&in_model(
        "    a = person 'A' {\n      perspectives {\n        'security' 'high'\n      }\n    }",
    ));
    let a = find(&workspace, "a");
    assert_eq!(a.base().perspectives["security"], "high");
    assert!(a.base().properties.is_empty());
}

#[test]
fn test_redeclaration_rejected() {
    let cases = [
        ("description 'x'\n      description 'y'", "description"),
        ("url 'x'\n      url 'y'", "url"),
        ("tags 'x'\n      tags 'y'", "tags"),
        ("perspectives {\n 'a' 'b'\n }\n      perspectives {\n 'c' 'd'\n }", "perspectives"),
    ];
    for (body, keyword) in cases {
        let err = parse_err(&in_model(&format!("    person 'A' {{\n      {body}\n    }}")));
        assert_eq!(
            err.to_string(),
            format!("illegal redeclaration of {keyword} in block")
        );
    }
}

#[test]
fn test_short_declaration_description_counts_as_declared() {
    let err = parse_err(&in_model(
        "    person 'A' 'Declared' {\n      description 'Again'\n    }",
    ));
    assert_eq!(
        err.to_string(),
        "illegal redeclaration of description in block"
    );
}

#[test]
fn test_short_declaration_requires_name() {
    let err = parse_err(&in_model("    person {\n    }"));
    assert_eq!(err.code(), ErrorCode::E100);
    assert!(
        err.to_string()
            .contains("did not parse enough arguments in short declaration"),
        "{err}"
    );
}

#[test]
fn test_groups() {
    let workspace = parse_ok(&in_model(
        r#"    group "Internal" {
      shop = softwareSystem 'Shop' {
        api = container 'API'
        group 'Storage' {
          db = container 'DB'
        }
      }
      person 'Admin'
    }
    user = person 'User'"#,
    ));

    assert_eq!(find(&workspace, "shop").base().group, "Internal");
    assert_eq!(find(&workspace, "api").base().group, "");
    assert_eq!(find(&workspace, "db").base().group, "Storage");
    assert_eq!(find(&workspace, "db").base().parent, Some(id("shop")));
    assert_eq!(find(&workspace, "user").base().group, "");

    let admin = IdentifierString::synthetic("person", 1, "Admin");
    assert_eq!(workspace.find(&admin).unwrap().base().group, "Internal");
}

#[test]
fn test_nested_group_rejected() {
    let err = parse_err(&in_model("    group 'a' {\n      group 'b' {\n      }\n    }"));
    let err = expectation(err);
    assert_eq!(err.got_keyword(), Some(Keyword::Group));
    assert_eq!(
        err.expected_keywords(),
        [Keyword::Person, Keyword::SoftwareSystem]
    );
}

#[test]
fn test_group_on_next_line_explains_terminator() {
    let err = parse_err(&in_model("    group 'a'\n    {\n    }"));
    assert_eq!(err.code(), ErrorCode::E100);
    let diagnostic = err.to_diagnostic();
    assert!(diagnostic.help().unwrap().contains("same line"));
}

#[test]
fn test_this_relationships() {
    let workspace = parse_ok(&in_model(
        "    user = person 'User' {\n      this -> shop 'Uses'\n      -> api\n    }",
    ));
    let relationships = find(&workspace, "user").relationships().unwrap();
    assert_eq!(relationships.len(), 2);
    assert_eq!(relationships[0].source_id, id("this"));
    assert_eq!(relationships[0].destination_id, id("shop"));
    assert_eq!(relationships[0].base.description, "Uses");
    assert_eq!(relationships[1].source_id, id("this"));
    assert_eq!(relationships[1].destination_id, id("api"));
}

#[test]
fn test_relationship_body() {
    let workspace = parse_ok(&in_model(
        "    a -> b {\n      technology 'HTTP'\n      tags 'sync'\n      url 'https://example.com'\n      properties {\n        'timeout' '5s'\n      }\n    }",
    ));
    let relationship = &workspace.model.as_ref().unwrap().relationships[0];
    assert_eq!(relationship.base.technology, "HTTP");
    assert_eq!(relationship.base.tags, vec!["sync"]);
    assert_eq!(relationship.base.url, "https://example.com");
    assert_eq!(relationship.base.properties["timeout"], "5s");

    let err = parse_err(&in_model("    a -> b {\n      name 'x'\n    }"));
    assert!(matches!(err, ParseError::Expectation(_)));
}

#[test]
fn test_assignment_requires_element_keyword() {
    let err = parse_err(&in_model("    a = description 'x'"));
    let err = expectation(err);
    assert_eq!(err.got_keyword(), Some(Keyword::Description));
    assert_eq!(
        err.expected_keywords(),
        [Keyword::Person, Keyword::SoftwareSystem]
    );

    let err = parse_err(&in_model("    a = container 'x'"));
    assert!(matches!(err, ParseError::Expectation(_)));
}

#[test]
fn test_assignment_needs_element_scope() {
    let err = parse_err(&in_model("    user = person 'User' {\n      a = person 'B'\n    }"));
    let err = expectation(err);
    assert!(err.got().is(TokenKind::Assignment));
    assert_eq!(err.expected_kinds(), [TokenKind::Relationship]);
}

#[test]
fn test_statement_end_before_closing_brace() {
    let workspace = parse_ok(&in_model("    a = person 'A' { url 'x' }"));
    assert_eq!(find(&workspace, "a").base().url, "x");
}

#[test]
fn test_views_unsupported() {
    let err = parse_err("workspace {\n  views {\n  }\n}\n");
    assert_eq!(err.code(), ErrorCode::E102);
    let ParseError::Unsupported { construct, token } = &err else {
        panic!("expected an unsupported error, got {err:?}");
    };
    assert_eq!(construct, "views");
    assert_eq!(token.range().start().line(), 2);
}

#[test]
fn test_model_on_next_line_explains_terminator() {
    let err = parse_err("workspace {\n  model\n  {\n  }\n}\n");
    assert_eq!(err.code(), ErrorCode::E100);
    assert!(err.token_at_error().unwrap().is(TokenKind::Terminator));
    assert!(err.to_diagnostic().help().unwrap().contains("same line"));
}

#[test]
fn test_lex_error_surfaces() {
    let err = parse_err(&in_model("    user = person 'A' %"));
    assert!(matches!(err, ParseError::Lex(_)));
    assert_eq!(err.code(), ErrorCode::E001);
    assert_eq!(err.token_at_error().unwrap().range().start().line(), 3);
}

#[test]
fn test_model_redefinition_rejected() {
    let err = parse_err("workspace {\n  model {\n  }\n  model {\n  }\n}\n");
    assert_eq!(err.to_string(), "invalid redefinition of model");
    assert_eq!(err.code(), ErrorCode::E200);
    assert_eq!(err.token_at_error().unwrap().range().start().line(), 4);
}

#[test]
fn test_extends() {
    let workspace = parse_ok("workspace extends 'base.c4' {\n  name 'Child'\n}\n");
    assert_eq!(workspace.extends.as_deref(), Some("base.c4"));
    assert_eq!(workspace.base.name, "Child");

    let err = parse_err("workspace model {\n}\n");
    let err = expectation(err);
    assert_eq!(err.expected_keywords(), [Keyword::Extends]);
}

#[test]
fn test_empty_workspace_declaration() {
    let workspace = parse_ok("workspace 'Empty';\n");
    assert_eq!(workspace.base.name, "Empty");
    assert!(workspace.model.is_none());
}

#[test]
fn test_unexpected_end_of_input() {
    let err = parse_err("workspace {\n  model {\n");
    assert_eq!(err.code(), ErrorCode::E101);
}

#[test]
fn test_trailing_workspace_rejected_by_run() {
    let err = parse_err("workspace 'A'\nworkspace 'B'\n");
    let err = expectation(err);
    assert_eq!(err.got_keyword(), Some(Keyword::Workspace));
    assert_eq!(err.expected_kinds(), [TokenKind::Eof]);
}

#[test]
fn test_run_all() {
    let mut provider = CachingProvider::new(
        MemoryLoader::default()
            .with_source("main.c4", "workspace 'A'\n\nworkspace 'B' {\n}\n")
            .with_source("empty.c4", "\n"),
    );

    let workspaces = Parser::run_all("main.c4", &mut provider).unwrap();
    let names: Vec<&str> = workspaces.iter().map(|w| w.base.name.as_str()).collect();
    assert_eq!(names, ["A", "B"]);
    assert_ne!(workspaces[0].id(), workspaces[1].id());

    let err = Parser::run_all("empty.c4", &mut provider).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E101);
}

#[test]
fn test_directive_rejected() {
    let err = parse_err(&in_model("    !"));
    let err = expectation(err);
    assert!(err.got().is(TokenKind::Directive));
}

#[test]
fn test_unknown_pragma_unsupported() {
    let err = parse_err("#define 'x'\nworkspace\n");
    assert_eq!(err.code(), ErrorCode::E102);
    assert_eq!(err.to_string(), "pragma #define is not supported");
}

#[test]
fn test_include_requires_string() {
    let err = parse_err("#include other\nworkspace\n");
    assert_eq!(err.to_string(), "#include requires a file name string");
}

#[test]
fn test_missing_entry_file() {
    let mut provider = CachingProvider::new(MemoryLoader::default());
    let err = Parser::run("main.c4", &mut provider).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E300);
}
