//! Integration tests for binding and re-rendering mounted instances

use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;

use futures::executor::block_on;
use pretty_assertions::assert_eq;

use fragment_kit::{
    Binding, BindingError, Document, Dom, Framework, FsFetcher, Instance, MemoryFetcher, NodeId,
    SharedDom, Value,
};

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn document() -> (Rc<RefCell<Document>>, NodeId) {
    let doc = Rc::new(RefCell::new(Document::new()));
    let container = {
        let mut d = doc.borrow_mut();
        let c = d.create_element("div");
        d.set_attribute(c, "id", "container").unwrap();
        let body = d.body();
        d.append_child(body, c).unwrap();
        c
    };
    (doc, container)
}

/// Mount a fixture template from tests/fixtures
fn mount_fixture(name: &str, file: &str) -> (Rc<RefCell<Document>>, Instance) {
    let (doc, container) = document();
    let shared: SharedDom = doc.clone();
    let framework = Framework::new(shared, FsFetcher::with_base_path(fixtures()));
    let instance =
        block_on(framework.mount(container, name, file, Vec::new())).expect("Should mount");
    (doc, instance)
}

#[test]
fn test_single_value_model() {
    let (doc, instance) = mount_fixture("testComponent", "testComponent.html");
    let element = instance.element();

    instance.set("foo", "yogurt");
    instance.render();
    assert_eq!(doc.borrow().text_content(element), "yogurt");

    let food = Rc::new(RefCell::new("granola".to_string()));
    let current = Rc::clone(&food);
    instance.set("foo", Binding::computed(move || current.borrow().clone()));
    instance.render();
    assert_eq!(doc.borrow().text_content(element), "granola");

    // Changing the captured value is enough; the binding is not set again
    *food.borrow_mut() = "kale".to_string();
    instance.render();
    assert_eq!(doc.borrow().text_content(element), "kale");
}

#[test]
fn test_unbound_key_renders_empty() {
    let (doc, instance) = mount_fixture("testComponent", "testComponent.html");
    let outcome = instance.render();
    assert!(outcome.is_clean());
    assert_eq!(doc.borrow().text_content(instance.element()), "");
}

#[test]
fn test_simple_model_multiple_locations() {
    let (doc, instance) = mount_fixture("simpleModel", "simpleModel.html");
    instance.set("foo", "yogurt");
    instance.set("bar", "granola");
    instance.render();

    let doc = doc.borrow();
    let div = doc.child_elements(instance.element())[0];
    assert_eq!(doc.tag_name(div), Some("div"));

    let spans = doc.child_elements(div);
    assert_eq!(spans.len(), 2);
    assert_eq!(doc.text_content(spans[0]), "granola");
    assert_eq!(doc.text_content(spans[1]), "yogurt");

    // The div's own text is the whitespace around a bare {{foo}}
    let own_text: String = doc
        .children(div)
        .iter()
        .filter(|&&n| doc.tag_name(n).is_none())
        .map(|&n| doc.text_content(n))
        .collect();
    assert_eq!(own_text.trim(), "yogurt");

    assert_eq!(instance.shown("foo"), vec!["yogurt", "yogurt"]);
    assert_eq!(instance.shown("bar"), vec!["granola"]);
}

#[test]
fn test_rerender_updates_every_location() {
    let (doc, instance) = mount_fixture("simpleModel", "simpleModel.html");
    instance.set("foo", "yogurt");
    instance.set("bar", "granola");
    instance.render();

    instance.set("foo", "kale");
    let outcome = instance.render();
    assert_eq!(outcome.updated, 2);
    assert_eq!(outcome.unchanged, 1);

    let doc = doc.borrow();
    let div = doc.child_elements(instance.element())[0];
    let spans = doc.child_elements(div);
    assert_eq!(doc.text_content(spans[0]), "granola");
    assert_eq!(doc.text_content(spans[1]), "kale");
}

#[test]
fn test_render_writes_only_changed_text() {
    let (doc, instance) = mount_fixture("todoList", "todoList.html");
    instance.set("first", "milk");
    instance.set("second", "eggs");
    instance.set("count", 2i64);
    instance.render();
    let writes = doc.borrow().text_writes();

    // Nothing changed
    let outcome = instance.render();
    assert_eq!(outcome.updated, 0);
    assert_eq!(doc.borrow().text_writes(), writes);

    instance.set("second", "bread");
    let outcome = instance.render();
    assert_eq!(outcome.updated, 1);
    assert_eq!(doc.borrow().text_writes(), writes + 1);

    let doc = doc.borrow();
    let items = doc.query_tag("li");
    assert_eq!(doc.text_content(items[0]), "milk");
    assert_eq!(doc.text_content(items[1]), "bread");
    assert_eq!(doc.text_content(doc.query_tag("p")[0]), "2 items");
}

#[test]
fn test_structure_is_preserved_across_renders() {
    let (doc, instance) = mount_fixture("todoList", "todoList.html");
    let list = doc.borrow().query_tag("ul")[0];
    instance.set("first", "milk");
    instance.render();
    instance.set("first", "cheese");
    instance.render();
    assert_eq!(doc.borrow().query_tag("ul"), vec![list]);
    assert_eq!(doc.borrow().get_attribute(list, "class"), Some("todo-list"));
}

#[test]
fn test_computed_binding_is_reevaluated() {
    let (doc, instance) = mount_fixture("testComponent", "testComponent.html");
    let counter = Rc::new(Cell::new(0));
    let source = Rc::clone(&counter);
    instance.set(
        "foo",
        Binding::computed(move || {
            source.set(source.get() + 1);
            Value::from(source.get())
        }),
    );

    instance.render();
    instance.render();
    assert_eq!(counter.get(), 2);
    assert_eq!(doc.borrow().text_content(instance.element()), "2");
}

#[test]
fn test_failing_binding_keeps_previous_content() {
    let (doc, instance) = mount_fixture("simpleModel", "simpleModel.html");
    instance.set("foo", "yogurt");
    instance.set("bar", "granola");
    instance.render();

    instance.set(
        "foo",
        Binding::fallible(|| Err(BindingError::new("pantry is empty"))),
    );
    instance.set("bar", "kale");
    let outcome = instance.render();

    assert_eq!(outcome.failed, vec!["foo".to_string()]);
    assert_eq!(outcome.updated, 1);
    assert_eq!(instance.shown("foo"), vec!["yogurt", "yogurt"]);

    let doc = doc.borrow();
    let div = doc.child_elements(instance.element())[0];
    let spans = doc.child_elements(div);
    assert_eq!(doc.text_content(spans[0]), "kale");
    assert_eq!(doc.text_content(spans[1]), "yogurt");
}

#[test]
fn test_rendered_html_snapshot() {
    let (doc, container) = document();
    let shared: SharedDom = doc.clone();
    let fetcher = MemoryFetcher::new().with_file(
        "card.html",
        r#"<section class="card"><h1>{{ title }}</h1><br><p>{{ body }} km</p></section>"#,
    );
    let framework = Framework::new(shared, fetcher);
    let card = block_on(framework.mount(container, "infoCard", "card.html", Vec::new())).unwrap();
    card.set("title", "Fish <& chips>");
    card.set("body", 3.5);
    card.render();

    insta::assert_snapshot!(
        doc.borrow().outer_html(card.element()),
        @r#"<info-card data-component-id="1" data-instance-id="1"><section class="card"><h1>Fish &lt;&amp; chips&gt;</h1><br><p>3.5 km</p></section></info-card>"#
    );
}

#[test]
#[should_panic(expected = "oven on fire")]
fn test_panicking_computed_binding_is_not_caught() {
    let (_doc, instance) = mount_fixture("testComponent", "testComponent.html");
    instance.set(
        "foo",
        Binding::computed(|| -> Value { panic!("oven on fire") }),
    );
    instance.render();
}

#[test]
fn test_computed_binding_reads_the_document() {
    let (doc, instance) = mount_fixture("simpleModel", "simpleModel.html");
    let element = instance.element();
    let reader = Rc::clone(&doc);
    instance.set("bar", "granola");
    instance.set(
        "foo",
        Binding::computed(move || reader.borrow().query_tag("span").len() as i64),
    );
    instance.render();
    assert_eq!(instance.shown("foo"), vec!["2", "2"]);
    assert_eq!(doc.borrow().text_content(doc.borrow().query_tag("span")[1]), "2");
    assert_eq!(doc.borrow().tag_name(element), Some("simple-model"));
}

#[test]
#[should_panic]
fn test_computed_binding_cannot_read_its_own_instance() {
    let (_doc, instance) = mount_fixture("testComponent", "testComponent.html");
    let me = instance.clone();
    instance.set("foo", Binding::computed(move || me.shown("foo").join(",")));
    instance.render();
}
