// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Confirm-guarded buttons.
//!
//! A guarded button fires only on a second click made after the confirm
//! delay. Moving the pointer off an armed button disarms it.
//!
//! Run:
//! - `cargo run -p understory_demos --example popover_confirm`

use std::cell::RefCell;
use std::rc::Rc;

use understory_popover::{
    ButtonGroupOptions, ButtonOptions, CONFIRM_DELAY_MS, Callbacks, Document, PopoverConfig,
};

fn main() {
    let fired = Rc::new(RefCell::new(Vec::new()));
    let (delete, copy) = (fired.clone(), fired.clone());
    let callbacks = Callbacks::new()
        .with("delete", move |_| delete.borrow_mut().push("delete"))
        .with("copy", move |_| copy.borrow_mut().push("copy"));

    let config = PopoverConfig::new().with_icon("more").with_item(
        "tools",
        ButtonGroupOptions::new()
            .with("copy", ButtonOptions::new("copy").with_title("Copy"))
            .with(
                "delete",
                ButtonOptions::new("delete")
                    .with_title("Delete")
                    .with_confirm(true),
            ),
    );

    let mut doc = Document::new();
    let body = doc.body();
    let id = doc.insert(body, config, callbacks).unwrap();
    let tools = doc.popover(id).unwrap().buttons("tools").unwrap();
    let delete_el = tools.button_element("delete").unwrap();
    let copy_el = tools.button_element("copy").unwrap();

    // Arm, then leave before confirming.
    doc.click(delete_el, 0).unwrap();
    doc.pointer_move(Some(delete_el), 10).unwrap();
    doc.pointer_move(Some(body), 20).unwrap();
    let armed = doc.popover(id).unwrap().buttons("tools").unwrap().armed();
    println!("armed after pointer left: {armed:?}");

    // Arm again and confirm once the delay elapsed.
    doc.click(delete_el, 1_000).unwrap();
    doc.click(delete_el, 1_000 + CONFIRM_DELAY_MS / 2).unwrap();
    println!("fired before delay: {:?}", fired.borrow());
    doc.click(delete_el, 1_000 + CONFIRM_DELAY_MS).unwrap();
    println!("fired after delay: {:?}", fired.borrow());

    // Unguarded buttons fire right away.
    doc.click(copy_el, 3_000).unwrap();
    println!("fired: {:?}", fired.borrow());
    assert_eq!(*fired.borrow(), ["delete", "copy"]);
}
