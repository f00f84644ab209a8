mod common;

use common::budget_alloc::BudgetAlloc;
use markup_runs::{Directive, Tag};

#[global_allocator]
static ALLOC: BudgetAlloc = BudgetAlloc::new();

// One test per binary: the counting allocator is process-wide.
#[test]
fn directive_lookup_does_not_allocate() {
    let names = ["p", "P", "BlockQuote", "H6", "figcaption", "span", "CUSTOM-ELEMENT", ""];
    let (found, usage) = ALLOC.measure(|| {
        names
            .iter()
            .filter(|name| Directive::lookup(name).is_some())
            .count()
    });
    assert_eq!(found, 5);
    assert_eq!(usage.allocs, 0, "lookup allocated {} times", usage.allocs);
    assert_eq!(Tag::from_name("BlockQuote"), Some(Tag::Blockquote));
}
