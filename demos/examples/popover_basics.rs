// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An editor's "insert node" popover.
//!
//! Opens the popover, lays out its panel against a measured trigger, picks a
//! link and closes it again with a click on the document.
//!
//! Run:
//! - `cargo run -p understory_demos --example popover_basics`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Rect;
use understory_popover::{Callbacks, Direction, Document, PopoverConfig};

fn main() {
    let picked = Rc::new(RefCell::new(Vec::new()));
    let sink = picked.clone();
    let callbacks = Callbacks::new().with("node", move |args| {
        sink.borrow_mut().push(args.join("/"));
    });

    let config = PopoverConfig::new()
        .with_direction(Direction::Se)
        .with_icon("add")
        .with_link("node/p", "Paragraph")
        .with_link("node/h1", "Heading")
        .with_link("node/image", "Image");

    let mut doc = Document::new();
    let body = doc.body();
    let id = doc.insert(body, config, callbacks).unwrap();

    // Give trigger and items their layout boxes, then run the requested layout.
    let pop = doc.popover(id).unwrap();
    let trigger = pop.trigger();
    let items: Vec<_> = pop
        .keys()
        .filter_map(|key| pop.item_wrapper(key))
        .collect();
    let tree = doc.tree_mut();
    tree.set_bounds(trigger, Rect::new(0.0, 0.0, 32.0, 32.0));
    for (i, item) in items.iter().enumerate() {
        let y = 40.0 * i as f64;
        tree.set_bounds(*item, Rect::new(0.0, y, 120.0, y + 24.0));
    }
    println!("layouts run: {}", doc.frame());

    doc.click(trigger, 0).unwrap();
    println!("open after trigger click: {}", doc.popover(id).unwrap().is_open());

    let image = doc.popover(id).unwrap().item_root("node/image").unwrap();
    doc.click(image, 50).unwrap();
    println!("value: {:?}", doc.popover(id).unwrap().value());

    doc.click(body, 100).unwrap();
    println!("open after body click: {}", doc.popover(id).unwrap().is_open());

    assert_eq!(*picked.borrow(), ["image"]);
}
