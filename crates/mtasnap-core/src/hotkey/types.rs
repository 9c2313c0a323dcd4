/// What a recognized key means to the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Reset the cycle to position 1.
    CycleStart,
    /// Step the cycle forward.
    Advance,
    /// Stop the dispatch loop.
    Quit,
}

/// One recognized key-down event. The label is the logical key name used
/// for debouncing and artifact filenames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub action: KeyAction,
    pub label: &'static str,
}

/// Map a Windows virtual-key code to a logical event. Every Alt variant
/// starts a cycle, Q and E advance it, Escape quits; anything else is
/// never delivered.
pub fn map_virtual_key(vk: u32) -> Option<KeyEvent> {
    match vk {
        // VK_MENU, VK_LMENU, VK_RMENU
        0x12 | 0xA4 | 0xA5 => Some(KeyEvent {
            action: KeyAction::CycleStart,
            label: "alt",
        }),
        // 'Q'
        0x51 => Some(KeyEvent {
            action: KeyAction::Advance,
            label: "q",
        }),
        // 'E'
        0x45 => Some(KeyEvent {
            action: KeyAction::Advance,
            label: "e",
        }),
        // VK_ESCAPE
        0x1B => Some(KeyEvent {
            action: KeyAction::Quit,
            label: "esc",
        }),
        _ => None,
    }
}
