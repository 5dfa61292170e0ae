//! Dropdown demo: a menu button whose panel closes on any outside press.
//!
//! Run with `cargo run --example dropdown` in a terminal with mouse support.
//! Click the button to toggle the menu, click anywhere else to close it,
//! press `q` to quit. Set `RUST_LOG=click_away=trace` to watch the watcher
//! work (logs go to stderr).

use std::cell::Cell;
use std::io::{self, stdout};
use std::rc::Rc;

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode};
use crossterm::execute;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Clear, List, Paragraph};
use ratatui::Frame;

use click_away::{
    EventDispatcher, InputEvent, NodeId, OutsideWatcher, RegionHandle, ViewTree, MOUSE_DOWN,
};

const BUTTON_AREA: Rect = Rect {
    x: 2,
    y: 1,
    width: 20,
    height: 3,
};
const PANEL_AREA: Rect = Rect {
    x: 2,
    y: 4,
    width: 20,
    height: 6,
};
const MENU_ITEMS: [&str; 4] = ["New file", "Open...", "Save", "Quit"];

struct Dropdown {
    tree: ViewTree,
    /// Wraps the button and (when open) the panel, so both count as inside.
    wrapper: NodeId,
    button: NodeId,
    panel: Rc<Cell<Option<NodeId>>>,
}

impl Dropdown {
    fn new(tree: ViewTree) -> Self {
        let wrapper = tree.insert_root(BUTTON_AREA);
        let button = tree.insert(wrapper, BUTTON_AREA);
        Self {
            tree,
            wrapper,
            button,
            panel: Rc::new(Cell::new(None)),
        }
    }

    fn is_open(&self) -> bool {
        self.panel.get().is_some()
    }

    fn toggle(&self) {
        match self.panel.get() {
            Some(_) => close(&self.tree, self.wrapper, &self.panel),
            None => {
                self.tree.set_area(self.wrapper, BUTTON_AREA.union(PANEL_AREA));
                self.panel.set(Some(self.tree.insert(self.wrapper, PANEL_AREA)));
            }
        }
    }
}

fn close(tree: &ViewTree, wrapper: NodeId, panel: &Rc<Cell<Option<NodeId>>>) {
    if let Some(id) = panel.take() {
        tree.remove(id);
        tree.set_area(wrapper, BUTTON_AREA);
    }
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let tree = ViewTree::new();
    let background = tree.insert_root(Rect::new(0, 0, 80, 24));
    let dropdown = Dropdown::new(tree.clone());

    let dispatcher = EventDispatcher::new();
    let region = RegionHandle::for_node(dropdown.wrapper);
    let close_tree = tree.clone();
    let close_panel = Rc::clone(&dropdown.panel);
    let wrapper = dropdown.wrapper;
    let _watcher = OutsideWatcher::attach_with_events(
        &dispatcher,
        &tree,
        region,
        move |_| close(&close_tree, wrapper, &close_panel),
        &[MOUSE_DOWN],
    )
    .expect("non-empty event set");

    let mut terminal = ratatui::init();
    execute!(stdout(), EnableMouseCapture)?;

    loop {
        terminal.draw(|frame| draw(frame, &dropdown))?;
        match event::read()? {
            Event::Key(key) if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) => break,
            Event::Mouse(mouse) => {
                if let Some(input) = InputEvent::from_mouse(&tree, &mouse) {
                    dispatcher.dispatch(&input);
                    if input.name == MOUSE_DOWN && input.target == Some(dropdown.button) {
                        dropdown.toggle();
                    }
                }
            }
            Event::Resize(width, height) => {
                tree.set_area(background, Rect::new(0, 0, width, height));
            }
            _ => {}
        }
    }

    execute!(stdout(), DisableMouseCapture)?;
    ratatui::restore();
    Ok(())
}

fn draw(frame: &mut Frame, dropdown: &Dropdown) {
    let hint = Paragraph::new("click the button to open the menu, click elsewhere to close, q quits");
    frame.render_widget(hint, Rect::new(2, frame.area().height.saturating_sub(2), 76, 1));

    let label = if dropdown.is_open() { "Menu \u{25b4}" } else { "Menu \u{25be}" };
    let button = Paragraph::new(label)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(button, BUTTON_AREA);

    if dropdown.is_open() {
        let menu = List::new(MENU_ITEMS)
            .style(Style::default().fg(Color::Cyan))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(Clear, PANEL_AREA);
        frame.render_widget(menu, PANEL_AREA);
    }
}
