// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A custom item: a stepper that reports its value after a quiet period.
//!
//! The stepper renders `-` and `+` anchors whose action paths name its own
//! handlers. Each step restarts a debounce timer; when the host ticks past the
//! deadline the value goes to the callback registered under the item's key.
//!
//! Run:
//! - `cargo run -p understory_demos --example popover_custom_item`

use std::cell::RefCell;
use std::rc::Rc;

use understory_popover::{
    Callbacks, ChangeSink, Document, HandlerTable, Item, ItemContext, ItemKind, PopoverConfig,
    PopoverError, Result, Timer, path,
};
use understory_surface::{ElementId, Tree};

const QUIET_MS: u64 = 250;

#[derive(Copy, Clone, Debug)]
enum Step {
    Down,
    Up,
}

#[derive(Debug)]
struct Stepper {
    el: ElementId,
    label: ElementId,
    value: i32,
    change: ChangeSink,
    quiet: Timer,
    handlers: HandlerTable<Step>,
}

impl Item<Tree> for Stepper {
    fn root(&self) -> ElementId {
        self.el
    }

    fn has_handler(&self, action: &str) -> bool {
        self.handlers.contains(action)
    }

    fn invoke(
        &mut self,
        action: &str,
        _args: &[&str],
        cx: &mut ItemContext<'_, Tree>,
    ) -> Result<()> {
        let step = self
            .handlers
            .get(action)
            .copied()
            .ok_or_else(|| PopoverError::UnknownHandler {
                item: self.change.key().into(),
                action: action.into(),
            })?;
        self.value += match step {
            Step::Down => -1,
            Step::Up => 1,
        };
        cx.surface.set_text(self.label, &self.value.to_string());
        self.quiet.start(cx.now, QUIET_MS);
        Ok(())
    }

    fn tick(&mut self, cx: &mut ItemContext<'_, Tree>) -> Result<()> {
        if self.quiet.fire_if_due(cx.now) {
            self.change.emit(cx.callbacks, &self.value.to_string())?;
        }
        Ok(())
    }

    fn next_deadline(&self) -> Option<u64> {
        self.quiet.due()
    }

    fn remove(&mut self, surface: &mut Tree) {
        self.quiet.cancel();
        surface.remove(self.el);
    }
}

fn stepper(tree: &mut Tree, key: &str, change: ChangeSink) -> Result<Box<dyn Item<Tree>>> {
    let el = tree.create("div.stepper");
    let mut handlers = HandlerTable::new();
    let down = tree.create("a");
    tree.set_attr(down, "href", &path::encode(key, Some("down"), None));
    tree.set_text(down, "-");
    handlers.insert("down", Step::Down);
    let label = tree.create("span.stepper-value");
    tree.set_text(label, "0");
    let up = tree.create("a");
    tree.set_attr(up, "href", &path::encode(key, Some("up"), None));
    tree.set_text(up, "+");
    handlers.insert("up", Step::Up);
    for child in [down, label, up] {
        tree.append(el, child);
    }
    Ok(Box::new(Stepper {
        el,
        label,
        value: 0,
        change,
        quiet: Timer::idle(),
        handlers,
    }))
}

fn main() {
    let reported = Rc::new(RefCell::new(Vec::new()));
    let sink = reported.clone();
    let callbacks = Callbacks::new().with("zoom", move |args| {
        sink.borrow_mut().push(args[0].to_string());
    });

    let config = PopoverConfig::new()
        .with_icon("zoom")
        .with_item("zoom", ItemKind::custom(stepper));

    let mut doc = Document::new();
    let body = doc.body();
    let id = doc.insert(body, config, callbacks).unwrap();

    let root = doc.popover(id).unwrap().item_root("zoom").unwrap();
    let up = doc.tree().children(root)[2];

    for now in [0, 100, 200] {
        doc.click(up, now).unwrap();
    }
    println!("next deadline: {:?}", doc.next_deadline());

    while let Some(due) = doc.next_deadline() {
        doc.tick(due).unwrap();
    }
    println!("reported: {:?}", reported.borrow());
    assert_eq!(*reported.borrow(), ["3"]);
}
