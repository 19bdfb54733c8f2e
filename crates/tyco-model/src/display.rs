//! Human-readable rendering of a type (the `toString` contract of spec
//! §3.1). Used for diagnostic messages; determinism here is what makes
//! golden-file testing of diagnostics feasible (spec §6.3).

use std::fmt::Write;

use crate::data::TypeData;
use crate::id::TypeId;
use crate::interner::TypeInterner;
use crate::shapes::{FnKind, PrototypeTarget};

/// Renders `ty` to its canonical display form.
pub fn display(interner: &TypeInterner, ty: TypeId) -> String {
    let mut out = String::new();
    write_type(interner, ty, &mut out);
    out
}

fn write_type(interner: &TypeInterner, ty: TypeId, out: &mut String) {
    match interner.get(ty) {
        TypeData::U8 => out.push_str("u8"),
        TypeData::U16 => out.push_str("u16"),
        TypeData::U32 => out.push_str("u32"),
        TypeData::U64 => out.push_str("u64"),
        TypeData::I8 => out.push_str("i8"),
        TypeData::I16 => out.push_str("i16"),
        TypeData::I32 => out.push_str("i32"),
        TypeData::I64 => out.push_str("i64"),
        TypeData::F32 => out.push_str("f32"),
        TypeData::F64 => out.push_str("f64"),
        TypeData::Bool => out.push_str("bool"),
        TypeData::Void => out.push_str("void"),
        TypeData::String => out.push_str("string"),
        TypeData::Null => out.push_str("null"),
        TypeData::Never => out.push_str("never"),
        TypeData::Any => out.push_str("any"),
        TypeData::Unset => out.push_str("<unset>"),
        TypeData::Error(e) => {
            let _ = write!(out, "<error: {}>", e.message);
        }
        TypeData::StringLiteral(v) => {
            let _ = write!(out, "\"{}\"", interner.resolve_name(v));
        }
        TypeData::StringEnum(values) => {
            out.push('(');
            for (i, v) in values.iter().enumerate() {
                if i > 0 {
                    out.push_str(" | ");
                }
                let _ = write!(out, "\"{}\"", interner.resolve_name(*v));
            }
            out.push(')');
        }
        TypeData::Array(elem) => {
            write_type(interner, elem, out);
            out.push_str("[]");
        }
        TypeData::Nullable(base) => {
            write_type(interner, base, out);
            out.push('?');
        }
        TypeData::Union(types) => write_joined(interner, &types, " | ", out),
        TypeData::Join(types) => write_joined(interner, &types, " & ", out),
        TypeData::Tuple(elements) => {
            out.push('[');
            write_joined(interner, &elements, ", ", out);
            out.push(']');
        }
        TypeData::Struct(s) => {
            out.push('{');
            for (i, f) in s.fields.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                let _ = write!(out, "{}: ", interner.resolve_name(f.name));
                write_type(interner, f.ty, out);
            }
            out.push('}');
        }
        TypeData::Interface(_) => out.push_str("<interface>"),
        TypeData::Class(_) => out.push_str("<class>"),
        TypeData::Implementation(_) => out.push_str("<implementation>"),
        TypeData::Variant(_) => out.push_str("<variant>"),
        TypeData::VariantConstructor(vc) => {
            let _ = write!(out, "{}", interner.resolve_name(vc.constructor_name));
            if !vc.generic_args.is_empty() {
                out.push('<');
                write_joined(interner, &vc.generic_args, ", ", out);
                out.push('>');
            }
        }
        TypeData::Enum(_) => out.push_str("<enum>"),
        TypeData::MetaClass(base) => {
            out.push_str("meta<");
            write_type(interner, base, out);
            out.push('>');
        }
        TypeData::MetaVariant(base, args) => write_meta(interner, base, &args, out),
        TypeData::MetaVariantConstructor(base, args) => write_meta(interner, base, &args, out),
        TypeData::MetaEnum(base) => {
            out.push_str("meta<");
            write_type(interner, base, out);
            out.push('>');
        }
        TypeData::Function(f) => {
            let mut sig = String::new();
            sig.push_str("fn(");
            for (i, p) in f.parameters.iter().enumerate() {
                if i > 0 {
                    sig.push_str(", ");
                }
                if p.is_mut {
                    sig.push_str("mut ");
                }
                write_type(interner, p.ty, &mut sig);
            }
            sig.push_str(") -> ");
            write_type(interner, f.return_type, &mut sig);
            if matches!(f.fn_type, FnKind::Coroutine) {
                let _ = write!(out, "coroutine<{sig}>");
            } else {
                out.push_str(&sig);
            }
        }
        TypeData::Coroutine(c) => {
            out.push_str("coroutine<fn(");
            for (i, p) in c.parameters.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_type(interner, p.ty, out);
            }
            out.push_str(") -> ");
            write_type(interner, c.yield_type, out);
            out.push('>');
        }
        TypeData::Generic(g) => out.push_str(&interner.resolve_name(g.name)),
        TypeData::Reference(r) => {
            let _ = write!(out, "ref#{}", r.declaration);
            if !r.generic_args.is_empty() {
                out.push('<');
                write_joined(interner, &r.generic_args, ", ", out);
                out.push('>');
            }
        }
        TypeData::Prototype(p) => {
            let name = match p.target {
                PrototypeTarget::Array => "array",
                PrototypeTarget::Coroutine => "coroutine",
                PrototypeTarget::String => "string",
            };
            let _ = write!(out, "<{name} prototype>");
        }
        TypeData::Namespace(n) => {
            let _ = write!(out, "namespace {}", interner.resolve_name(n.name));
        }
        TypeData::Ffi(f) => {
            let _ = write!(out, "ffi {}", interner.resolve_name(f.name));
        }
        TypeData::ReturnType(inner) => {
            out.push_str("returnType<");
            write_type(interner, inner, out);
            out.push('>');
        }
        TypeData::TypeGuard(g) => {
            let _ = write!(out, "{} is ", interner.resolve_name(g.parameter_name));
            write_type(interner, g.guarded_type, out);
        }
    }
}

fn write_joined(interner: &TypeInterner, types: &[TypeId], sep: &str, out: &mut String) {
    for (i, t) in types.iter().enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        write_type(interner, *t, out);
    }
}

fn write_meta(interner: &TypeInterner, base: TypeId, args: &[TypeId], out: &mut String) {
    out.push_str("meta<");
    write_type(interner, base, out);
    if !args.is_empty() {
        out.push('<');
        write_joined(interner, args, ", ", out);
        out.push('>');
    }
    out.push('>');
}
