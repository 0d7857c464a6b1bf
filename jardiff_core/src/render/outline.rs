use super::classfile::{self, access, Member};
use super::ClassRenderer;
use jardiff_common::Result;

/// Renderer producing an ABI outline: package and class declaration, field
/// signatures, and method signatures, without method bodies or debug info.
///
/// Useful for spotting interface-breaking changes while ignoring classes
/// that were merely recompiled.
pub struct ClassOutline {
    /// When set, compiler-generated bridge methods are left out of the
    /// outline so that recompilation artifacts do not show up as changes.
    pub skip_synthetic_bridges: bool,
}

impl Default for ClassOutline {
    fn default() -> Self {
        Self {
            skip_synthetic_bridges: true,
        }
    }
}

impl ClassRenderer for ClassOutline {
    fn render(&self, bytes: &[u8]) -> Result<Vec<String>> {
        let class = classfile::parse(bytes)?;
        let mut lines = Vec::new();

        let binary_name = class.this_class.replace('/', ".");
        let (package, simple_name) = match binary_name.rsplit_once('.') {
            Some((package, simple_name)) => (package, simple_name),
            None => ("", binary_name.as_str()),
        };
        if !package.is_empty() {
            lines.push(format!("package {package};"));
            lines.push(String::new());
        }

        lines.push(class_declaration(&class, simple_name));

        for field in &class.fields {
            lines.push(format!("  {}", field_signature(field)));
        }
        for method in &class.methods {
            if method.name == "<clinit>" {
                continue;
            }
            if self.skip_synthetic_bridges && is_synthetic_bridge(method.access_flags) {
                continue;
            }
            lines.push(format!("  {}", method_signature(method, simple_name)));
        }

        lines.push("}".to_string());
        Ok(lines)
    }
}

fn is_synthetic_bridge(flags: u16) -> bool {
    flags & access::SYNTHETIC != 0 && flags & access::BRIDGE != 0
}

fn class_declaration(class: &classfile::RawClass, simple_name: &str) -> String {
    let flags = class.access_flags;
    let mut declaration = String::new();
    if flags & access::PUBLIC != 0 {
        declaration.push_str("public ");
    }
    if flags & access::FINAL != 0 {
        declaration.push_str("final ");
    }

    let kind = if flags & access::ANNOTATION != 0 {
        "@interface"
    } else if flags & access::INTERFACE != 0 {
        "interface"
    } else if flags & access::ENUM != 0 {
        "enum"
    } else if flags & access::ABSTRACT != 0 {
        "abstract class"
    } else {
        "class"
    };
    declaration.push_str(kind);
    declaration.push(' ');
    declaration.push_str(simple_name);

    if let Some(super_class) = &class.super_class {
        if super_class != "java/lang/Object" {
            declaration.push_str(" extends ");
            declaration.push_str(&super_class.replace('/', "."));
        }
    }
    if !class.interfaces.is_empty() {
        declaration.push_str(" implements ");
        let names: Vec<String> = class
            .interfaces
            .iter()
            .map(|name| name.replace('/', "."))
            .collect();
        declaration.push_str(&names.join(", "));
    }

    declaration.push_str(" {");
    declaration
}

fn field_signature(field: &Member) -> String {
    let (field_type, _) = take_type(&field.descriptor);
    format!(
        "{}{} {}",
        field_modifiers(field.access_flags),
        field_type,
        field.name
    )
}

fn method_signature(method: &Member, simple_name: &str) -> String {
    let modifiers = method_modifiers(method.access_flags);
    let (parameters, return_type) = method_descriptor(&method.descriptor);
    if method.name == "<init>" {
        format!("{modifiers}{simple_name}({parameters})")
    } else {
        format!("{modifiers}{return_type} {}({parameters})", method.name)
    }
}

fn field_modifiers(flags: u16) -> String {
    let mut modifiers = visibility_modifiers(flags);
    if flags & access::TRANSIENT != 0 {
        modifiers.push("transient");
    }
    if flags & access::VOLATILE != 0 {
        modifiers.push("volatile");
    }
    join_modifiers(modifiers)
}

fn method_modifiers(flags: u16) -> String {
    let mut modifiers = visibility_modifiers(flags);
    if flags & access::ABSTRACT != 0 {
        modifiers.push("abstract");
    }
    if flags & access::SYNCHRONIZED != 0 {
        modifiers.push("synchronized");
    }
    if flags & access::NATIVE != 0 {
        modifiers.push("native");
    }
    join_modifiers(modifiers)
}

fn visibility_modifiers(flags: u16) -> Vec<&'static str> {
    let mut modifiers = Vec::new();
    if flags & access::PUBLIC != 0 {
        modifiers.push("public");
    }
    if flags & access::PRIVATE != 0 {
        modifiers.push("private");
    }
    if flags & access::PROTECTED != 0 {
        modifiers.push("protected");
    }
    if flags & access::STATIC != 0 {
        modifiers.push("static");
    }
    if flags & access::FINAL != 0 {
        modifiers.push("final");
    }
    modifiers
}

fn join_modifiers(modifiers: Vec<&'static str>) -> String {
    if modifiers.is_empty() {
        String::new()
    } else {
        format!("{} ", modifiers.join(" "))
    }
}

/// Split a method descriptor `(…)R` into a rendered parameter list and
/// return type.
fn method_descriptor(descriptor: &str) -> (String, String) {
    let inner = descriptor
        .strip_prefix('(')
        .and_then(|rest| rest.split_once(')'));
    let (mut parameters_desc, return_desc) = match inner {
        Some((parameters, return_type)) => (parameters, return_type),
        None => ("", descriptor),
    };

    let mut parameters = Vec::new();
    while !parameters_desc.is_empty() {
        let (rendered, rest) = take_type(parameters_desc);
        parameters.push(rendered);
        parameters_desc = rest;
    }
    let (return_type, _) = take_type(return_desc);
    (parameters.join(", "), return_type)
}

/// Consume one field type from a descriptor, returning the Java source form
/// and the remaining descriptor text.
fn take_type(descriptor: &str) -> (String, &str) {
    let mut dimensions = 0;
    let mut rest = descriptor;
    while let Some(stripped) = rest.strip_prefix('[') {
        dimensions += 1;
        rest = stripped;
    }

    let (base, rest) = match rest.as_bytes().first() {
        Some(b'B') => ("byte".to_string(), &rest[1..]),
        Some(b'C') => ("char".to_string(), &rest[1..]),
        Some(b'D') => ("double".to_string(), &rest[1..]),
        Some(b'F') => ("float".to_string(), &rest[1..]),
        Some(b'I') => ("int".to_string(), &rest[1..]),
        Some(b'J') => ("long".to_string(), &rest[1..]),
        Some(b'S') => ("short".to_string(), &rest[1..]),
        Some(b'Z') => ("boolean".to_string(), &rest[1..]),
        Some(b'V') => ("void".to_string(), &rest[1..]),
        Some(b'L') => match rest.find(';') {
            Some(end) => (rest[1..end].replace('/', "."), &rest[end + 1..]),
            None => (rest[1..].replace('/', "."), ""),
        },
        _ => ("?".to_string(), ""),
    };

    (format!("{}{}", base, "[]".repeat(dimensions)), rest)
}

#[cfg(test)]
mod tests {
    use super::super::classfile::testdata;
    use super::*;
    use jardiff_common::JarDiffError;

    #[test]
    fn outlines_a_simple_class() {
        let lines = ClassOutline::default()
            .render(&testdata::simple_class(52))
            .unwrap();
        assert_eq!(
            lines,
            vec![
                "package com.acme;",
                "",
                "public class Foo {",
                "  private java.lang.String name",
                "  public java.lang.String greet(int)",
                "}",
            ]
        );
    }

    #[test]
    fn outline_is_deterministic() {
        let bytes = testdata::simple_class(52);
        let renderer = ClassOutline::default();
        assert_eq!(
            renderer.render(&bytes).unwrap(),
            renderer.render(&bytes).unwrap()
        );
    }

    #[test]
    fn rejects_non_class_bytes() {
        let result = ClassOutline::default().render(b"plain text");
        assert!(matches!(result, Err(JarDiffError::NotAClassFile(_))));
    }

    #[test]
    fn renders_primitive_and_array_descriptors() {
        assert_eq!(take_type("I").0, "int");
        assert_eq!(take_type("[[Z").0, "boolean[][]");
        assert_eq!(take_type("Ljava/util/List;").0, "java.util.List");
        assert_eq!(take_type("[Ljava/lang/String;").0, "java.lang.String[]");
    }

    #[test]
    fn renders_method_descriptors() {
        let (parameters, return_type) = method_descriptor("(I[Ljava/lang/String;)V");
        assert_eq!(parameters, "int, java.lang.String[]");
        assert_eq!(return_type, "void");

        let (parameters, return_type) = method_descriptor("()J");
        assert_eq!(parameters, "");
        assert_eq!(return_type, "long");
    }
}
