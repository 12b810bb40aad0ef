//! End-to-end tests from `jsdoc -X` style JSON to printed declarations.

use dtsdoc_ast::{ClassMember, DtsItem, InterfaceMember};
use dtsdoc_emit::{
    AccessLevel, Diagnostics, Doclet, EmitOptions, Emitter, WarningKind, generate,
    interface_merge_key,
};

fn docs(json: &str) -> Vec<Doclet> {
    Doclet::parse_list(json).expect("valid doclet json")
}

fn emit(json: &str) -> (String, Diagnostics) {
    let mut diags = Diagnostics::new();
    let output = generate(&docs(json), &EmitOptions::default(), &mut diags).unwrap();
    (output, diags)
}

/// Every declared name, members included, as `Parent.member` paths.
fn declared_names(items: &[DtsItem], prefix: &str, out: &mut Vec<String>) {
    for item in items {
        let path = format!("{prefix}{}", item.name());
        match item {
            DtsItem::Class(class) => {
                for member in &class.members {
                    match member {
                        ClassMember::Property(p) => out.push(format!("{path}.{}", p.name)),
                        ClassMember::Method(m) => out.push(format!("{path}.{}", m.name)),
                        ClassMember::Constructor(_) => {}
                    }
                }
            }
            DtsItem::Interface(interface) => {
                for member in &interface.members {
                    match member {
                        InterfaceMember::Property(p) => out.push(format!("{path}.{}", p.name)),
                        InterfaceMember::Method(m) => out.push(format!("{path}.{}", m.name)),
                    }
                }
            }
            DtsItem::Namespace(ns) => declared_names(&ns.items, &format!("{path}."), out),
            DtsItem::Module(m) => declared_names(&m.items, &format!("{path}."), out),
            _ => {}
        }
        out.push(path);
    }
}

#[test]
fn test_class_with_instance_method() {
    let (output, diags) = emit(
        r#"[
            {"kind": "class", "name": "Foo", "longname": "Foo", "scope": "global"},
            {"kind": "function", "name": "bar", "longname": "Foo#bar", "memberof": "Foo", "scope": "instance"}
        ]"#,
    );
    assert!(diags.is_empty());
    assert_eq!(output, "declare class Foo {\n    bar(): void;\n}\n\n");
}

#[test]
fn test_const_enum_from_properties() {
    let (output, _) = emit(
        r#"[
            {"kind": "constant", "name": "Color", "longname": "Color", "isEnum": true,
             "properties": [
                {"name": "RED", "defaultvalue": "red"},
                {"name": "BLUE", "defaultvalue": "blue"}
             ]}
        ]"#,
    );
    assert_eq!(
        output,
        "declare const enum Color {\n    RED = \"red\",\n    BLUE = \"blue\"\n}\n\n"
    );
}

#[test]
fn test_broken_memberof_dropped_with_one_warning() {
    let (output, diags) = emit(
        r#"[
            {"kind": "function", "name": "kept", "longname": "kept"},
            {"kind": "function", "name": "lost", "longname": "Missing.lost", "memberof": "Missing", "scope": "static"},
            {"kind": "member", "name": "also", "longname": "also", "type": {"names": ["string"]}}
        ]"#,
    );
    assert_eq!(diags.len(), 1);
    assert_eq!(diags.warnings()[0].kind, WarningKind::UnresolvedParent);
    assert!(!output.contains("lost"), "output:\n{output}");
    assert_eq!(
        output,
        "declare function kept(): void;\n\ndeclare var also: string;\n\n"
    );
}

#[test]
fn test_implements_produces_sibling_interface() {
    let input = docs(
        r#"[
            {"kind": "class", "name": "Foo", "longname": "Foo",
             "implements": ["A", "B"], "augments": ["Base"]}
        ]"#,
    );
    let options = EmitOptions::default();
    let mut diags = Diagnostics::new();
    let mut emitter = Emitter::new(&options);
    emitter.parse(&input, &mut diags).unwrap();

    let DtsItem::Interface(interface) = &emitter.results()[0] else {
        panic!("interface merge must precede its class: {:?}", emitter.results());
    };
    assert_eq!(interface.name, "Foo");
    let heritage: Vec<String> = interface.extends.iter().map(|t| t.to_string()).collect();
    assert_eq!(heritage, ["A", "B"]);

    let DtsItem::Class(class) = &emitter.results()[1] else {
        panic!("expected class");
    };
    assert!(class.implements.is_empty());
    assert_eq!(class.extends.as_ref().map(|t| t.to_string()).as_deref(), Some("Base"));

    assert_eq!(
        emitter.emit(),
        "declare interface Foo extends A, B {\n}\n\ndeclare class Foo extends Base {\n}\n\n"
    );
    assert!(interface_merge_key("Foo").ends_with("$$interface$helper"));
}

#[test]
fn test_interface_static_member_moves_to_namespace() {
    let (output, diags) = emit(
        r#"[
            {"kind": "interface", "name": "Shape", "longname": "Shape"},
            {"kind": "function", "name": "area", "longname": "Shape#area", "memberof": "Shape",
             "scope": "instance", "returns": [{"type": {"names": ["number"]}}]},
            {"kind": "function", "name": "unit", "longname": "Shape.unit", "memberof": "Shape",
             "scope": "static", "returns": [{"type": {"names": ["Shape"]}}]}
        ]"#,
    );
    assert!(diags.is_empty());
    assert_eq!(
        output,
        "declare namespace Shape {\n    function unit(): Shape;\n}\n\n\
         declare interface Shape {\n    area(): number;\n}\n\n"
    );
}

#[test]
fn test_namespace_merge_printed_beside_interface() {
    let (output, diags) = emit(
        r#"[
            {"kind": "typedef", "name": "Options", "longname": "Shape~Options", "memberof": "Shape",
             "scope": "inner", "type": {"names": ["string"]}},
            {"kind": "function", "name": "draw", "longname": "draw"},
            {"kind": "interface", "name": "Shape", "longname": "Shape"},
            {"kind": "function", "name": "unit", "longname": "Shape.unit", "memberof": "Shape", "scope": "static"}
        ]"#,
    );
    assert!(diags.is_empty());
    assert_eq!(
        output,
        "declare function draw(): void;\n\n\
         declare namespace Shape {\n    type Options = string;\n    function unit(): void;\n}\n\n\
         declare interface Shape {\n}\n\n"
    );
}

#[test]
fn test_namespace_merge_under_enum_is_declared() {
    let (output, diags) = emit(
        r#"[
            {"kind": "member", "name": "Color", "longname": "Color", "isEnum": true,
             "properties": [{"name": "RED", "defaultvalue": "red"}]},
            {"kind": "interface", "name": "Shade", "longname": "Color.Shade", "memberof": "Color", "scope": "static"},
            {"kind": "function", "name": "lighten", "longname": "Color.Shade.lighten",
             "memberof": "Color.Shade", "scope": "static"}
        ]"#,
    );
    assert!(diags.is_empty());
    assert_eq!(
        output,
        "declare enum Color {\n    RED = \"red\"\n}\n\n\
         declare namespace Shade {\n    function lighten(): void;\n}\n\n"
    );
}

#[test]
fn test_nested_types_live_in_companion_namespace() {
    let (output, _) = emit(
        r#"[
            {"kind": "class", "name": "Outer", "longname": "Outer"},
            {"kind": "class", "name": "Inner", "longname": "Outer.Inner", "memberof": "Outer", "scope": "static"},
            {"kind": "typedef", "name": "Options", "longname": "Outer.Options", "memberof": "Outer",
             "scope": "static", "type": {"names": ["Object"]},
             "properties": [{"name": "debug", "type": {"names": ["boolean"]}, "optional": true}]},
            {"kind": "member", "name": "size", "longname": "Outer#size", "memberof": "Outer",
             "scope": "instance", "type": {"names": ["number"]}, "readonly": true}
        ]"#,
    );
    assert_eq!(
        output,
        "declare class Outer {\n    readonly size: number;\n}\n\n\
         declare namespace Outer {\n    class Inner {\n    }\n    type Options = { debug?: boolean; };\n}\n\n"
    );
}

#[test]
fn test_nested_namespaces_use_dotted_name() {
    let (output, _) = emit(
        r#"[
            {"kind": "namespace", "name": "app", "longname": "app"},
            {"kind": "namespace", "name": "util", "longname": "app.util", "memberof": "app", "scope": "static"},
            {"kind": "function", "name": "noop", "longname": "app.util.noop", "memberof": "app.util", "scope": "static"}
        ]"#,
    );
    assert_eq!(
        output,
        "declare namespace app.util {\n    function noop(): void;\n}\n\n"
    );
}

#[test]
fn test_module_with_documented_function() {
    let (output, _) = emit(
        r#"[
            {"kind": "module", "name": "math", "longname": "module:math"},
            {"kind": "function", "name": "add", "longname": "module:math.add", "memberof": "module:math",
             "scope": "static", "comment": "/**\n * Adds.\n */", "description": "Adds two numbers.",
             "params": [
                {"name": "a", "type": {"names": ["number"]}, "description": "first"},
                {"name": "b", "type": {"names": ["number"]}, "optional": true}
             ],
             "returns": [{"type": {"names": ["number"]}, "description": "the sum"}]}
        ]"#,
    );
    assert_eq!(
        output,
        "declare module \"math\" {\n    /**\n     * Adds two numbers.\n     * @param a - first\n     * @returns the sum\n     */\n    function add(a: number, b?: number): number;\n}\n\n"
    );
}

#[test]
fn test_filtering_is_monotonic() {
    let input = docs(
        r#"[
            {"kind": "class", "name": "Svc", "longname": "Svc"},
            {"kind": "function", "name": "a", "longname": "Svc#a", "memberof": "Svc", "access": "private"},
            {"kind": "function", "name": "b", "longname": "Svc#b", "memberof": "Svc", "access": "package"},
            {"kind": "function", "name": "c", "longname": "Svc#c", "memberof": "Svc", "access": "protected"},
            {"kind": "function", "name": "d", "longname": "Svc#d", "memberof": "Svc", "access": "public"},
            {"kind": "function", "name": "e", "longname": "Svc#e", "memberof": "Svc"}
        ]"#,
    );
    let names_at = |access: AccessLevel, private: bool| {
        let options = EmitOptions {
            access,
            private,
            ..EmitOptions::default()
        };
        let mut diags = Diagnostics::new();
        let mut emitter = Emitter::new(&options);
        emitter.parse(&input, &mut diags).unwrap();
        let mut names = Vec::new();
        declared_names(emitter.results(), "", &mut names);
        names.sort();
        names
    };

    let levels = [
        AccessLevel::Private,
        AccessLevel::Package,
        AccessLevel::Protected,
        AccessLevel::Public,
    ];
    for pair in levels.windows(2) {
        let lower = names_at(pair[0], false);
        let higher = names_at(pair[1], false);
        assert!(
            higher.iter().all(|name| lower.contains(name)),
            "raising {} to {} added declarations: {higher:?} vs {lower:?}",
            pair[0],
            pair[1]
        );
    }

    assert_eq!(names_at(AccessLevel::Public, false), ["Svc", "Svc.d", "Svc.e"]);
    assert_eq!(
        names_at(AccessLevel::Public, true),
        ["Svc", "Svc.a", "Svc.d", "Svc.e"]
    );
}

#[test]
fn test_output_is_idempotent() {
    let input = docs(
        r#"[
            {"kind": "class", "name": "Foo", "longname": "Foo", "mixes": ["Events"]},
            {"kind": "interface", "name": "Events", "longname": "Events"},
            {"kind": "function", "name": "on", "longname": "Events#on", "memberof": "Events"},
            {"kind": "member", "name": "count", "longname": "Events.count", "memberof": "Events", "scope": "static",
             "type": {"names": ["number"]}}
        ]"#,
    );
    let options = EmitOptions::default();
    let first = generate(&input, &options, &mut Diagnostics::new()).unwrap();
    let second = generate(&input, &options, &mut Diagnostics::new()).unwrap();
    assert_eq!(first, second);
    assert!(first.contains("declare namespace Events {\n    var count: number;\n}"), "output:\n{first}");
}

#[test]
fn test_unknown_kind_aborts() {
    let err = Doclet::parse_list(r#"[{"kind": "gizmo", "name": "g", "longname": "g"}]"#).unwrap_err();
    assert!(err.to_string().contains("gizmo"), "unexpected error: {err}");
}
