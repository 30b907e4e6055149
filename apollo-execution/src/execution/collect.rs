use std::collections::HashSet;

use apollo_compiler::Name;
use apollo_compiler::Node;
use apollo_compiler::ast;
use indexmap::IndexMap;

use crate::execution::context::ExecutionContext;
use crate::schema::ObjectType;
use crate::spec::IncludeSkip;

/// Field nodes grouped by response key, in order of first occurrence.
pub(crate) type FieldsByKey<'a> = IndexMap<&'a str, Vec<&'a Node<ast::Field>>>;

/// Collects the fields of `selection_set` that apply to `object`.
///
/// Fields sharing a response key are merged under that key, so that several fragments
/// can contribute sub-selections to one field.
pub(crate) fn collect_fields<'a>(
    ctx: &'a ExecutionContext,
    object: &ObjectType,
    selection_set: &'a [ast::Selection],
    fields: &mut FieldsByKey<'a>,
    visited_fragments: &mut HashSet<&'a str>,
) {
    for selection in selection_set {
        match selection {
            ast::Selection::Field(field) => {
                if IncludeSkip::parse(&field.directives).should_skip(&ctx.variables) {
                    continue;
                }
                fields
                    .entry(field.response_name().as_str())
                    .or_default()
                    .push(field);
            }
            ast::Selection::InlineFragment(inline_fragment) => {
                if IncludeSkip::parse(&inline_fragment.directives).should_skip(&ctx.variables)
                    || !does_fragment_condition_match(
                        ctx,
                        inline_fragment.type_condition.as_ref(),
                        object,
                    )
                {
                    continue;
                }
                collect_fields(
                    ctx,
                    object,
                    &inline_fragment.selection_set,
                    fields,
                    visited_fragments,
                );
            }
            ast::Selection::FragmentSpread(spread) => {
                let name = spread.fragment_name.as_str();
                if visited_fragments.contains(name)
                    || IncludeSkip::parse(&spread.directives).should_skip(&ctx.variables)
                {
                    continue;
                }
                visited_fragments.insert(name);
                let Some(fragment) = ctx.query.fragments().get(name) else {
                    failfast_debug!("unknown fragment {name}");
                    continue;
                };
                if !does_fragment_condition_match(ctx, Some(&fragment.type_condition), object) {
                    continue;
                }
                collect_fields(
                    ctx,
                    object,
                    &fragment.selection_set,
                    fields,
                    visited_fragments,
                );
            }
        }
    }
}

/// Collects the merged sub-selections of the field nodes of one response key.
pub(crate) fn collect_subfields<'a>(
    ctx: &'a ExecutionContext,
    object: &ObjectType,
    field_nodes: &[&'a Node<ast::Field>],
) -> FieldsByKey<'a> {
    let mut fields = FieldsByKey::new();
    let mut visited_fragments = HashSet::new();
    for node in field_nodes {
        collect_fields(
            ctx,
            object,
            &node.selection_set,
            &mut fields,
            &mut visited_fragments,
        );
    }
    fields
}

/// A type condition applies when it names the object itself, or an abstract type the
/// object is a possible type of.
fn does_fragment_condition_match(
    ctx: &ExecutionContext,
    type_condition: Option<&Name>,
    object: &ObjectType,
) -> bool {
    let Some(condition) = type_condition else {
        return true;
    };
    let condition = condition.as_str();
    if condition == object.name {
        return true;
    }
    let parent_types = ctx.schema.possible_types(&object.name);
    ctx.schema
        .possible_types(condition)
        .iter()
        .any(|possible| parent_types.contains(possible))
}
