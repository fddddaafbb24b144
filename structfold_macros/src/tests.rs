//! Unit tests for the derive expansion.

use anyhow::{ensure, Context, Result};
use quote::quote;
use rstest::rstest;
use syn::{parse_str, DeriveInput};

use super::expand;

fn expand_source(source: &str) -> Result<String> {
    let input: DeriveInput = parse_str(source).context("parse derive input")?;
    let tokens = expand(input).map_err(|err| anyhow::anyhow!("expansion failed: {err}"))?;
    Ok(tokens.to_string())
}

#[rstest]
fn records_one_entry_per_field() -> Result<()> {
    let expanded = expand_source("struct Sample { count: u32, ratio: f64 }")?;
    let expected = quote! {
        #[automatically_derived]
        impl ::structfold::Mergeable for Sample {
            fn shape() -> &'static ::structfold::shape::Shape {
                ::structfold::shape::intern::<Self>(|| {
                    ::structfold::shape::Shape::aggregate::<Self>(
                        ::core::any::type_name::<Self>(),
                        ::std::vec![
                            ::structfold::shape::Field::new(
                                "count",
                                ::core::mem::offset_of!(Self, count),
                                <u32 as ::structfold::Mergeable>::shape,
                            ),
                            ::structfold::shape::Field::new(
                                "ratio",
                                ::core::mem::offset_of!(Self, ratio),
                                <f64 as ::structfold::Mergeable>::shape,
                            )
                        ],
                    )
                })
            }
        }
    };
    ensure!(
        expanded == expected.to_string(),
        "generated tokens differ:\n{expanded}\n!=\n{expected}"
    );
    Ok(())
}

#[rstest]
fn unit_structs_describe_no_fields() -> Result<()> {
    let expanded = expand_source("struct Empty;")?;
    ensure!(
        expanded.contains(":: std :: vec ! []"),
        "expected an empty field list: {expanded}"
    );
    Ok(())
}

#[rstest]
fn generic_parameters_gain_field_bounds() -> Result<()> {
    let expanded = expand_source("struct Pair<T> { left: T, right: T }")?;
    ensure!(
        expanded.contains("where T : :: structfold :: Mergeable"),
        "expected a per-field bound: {expanded}"
    );
    Ok(())
}

#[rstest]
#[case("struct Tuple(u32);", "named fields")]
#[case("enum Choice { A, B }", "structs")]
fn rejects_unsupported_shapes(#[case] source: &str, #[case] needle: &str) -> Result<()> {
    let input: DeriveInput = parse_str(source).context("parse derive input")?;
    let err = expand(input).expect_err("expansion should fail");
    ensure!(
        err.to_string().contains(needle),
        "unexpected diagnostic: {err}"
    );
    Ok(())
}
