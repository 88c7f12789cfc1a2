//! Software-rendered visualizer using `minifb`.
//!
//! Draws the calculator over the frame: buttons, the display strip with the
//! current expression, the tracked hand and the pinch pointer, plus a status
//! bar.  In simulation mode it also turns the mouse into [`SimInput`]s.

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use std::sync::mpsc::Sender;

use crate::app::AppState;
use crate::error::AppError;
use crate::landmarks::{Hand, HAND_CONNECTIONS};
use crate::layout::{Rect, Region};
use crate::projector::{to_pixel, Point, Pointer};
use crate::source::SimInput;

// ════════════════════════════════════════════════════════════════════════════
// Colours and sizes
// ════════════════════════════════════════════════════════════════════════════

pub const WINDOW_TITLE: &str = "Hand Calculator";

const BG_COLOR:       u32 = 0xFF1A1A2E;
const BUTTON_FILL:    u32 = 0xFF323232;
const BUTTON_BORDER:  u32 = 0xFF0A0A0A;
const PRESSED_FILL:   u32 = 0xFF00FF00;
const HOVER_BORDER:   u32 = 0xFF9A9A9A;
const LABEL_COLOR:    u32 = 0xFFFFFFFF;
const DISPLAY_TEXT:   u32 = 0xFFFF00FF;
const MARKER_COLOR:   u32 = 0xFFFF00FF;
const PINCH_COLOR:    u32 = 0xFF00FF00;
const SKELETON_COLOR: u32 = 0xFFDDDDDD;
const STATUS_BG:      u32 = 0xFF0F3460;

const BORDER_PX:      i32 = 3;
const MARKER_R:       i32 = 10;
const LABEL_SCALE:    i32 = 4;
const DISPLAY_SCALE:  i32 = 5;
const STATUS_SCALE:   i32 = 2;
const STATUS_H:       i32 = 36;

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    buf:    Vec<u32>,
    width:  usize,
    height: usize,
    sim_tx: Sender<SimInput>,
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimInput>, width: usize, height: usize) -> Result<Self, AppError> {
        let mut window = Window::new(
            WINDOW_TITLE,
            width, height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| AppError::Window(e.to_string()))?;

        window.set_target_fps(30); // camera rate

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; width * height],
            width,
            height,
            sim_tx,
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll the keyboard for quit and forward the mouse as simulated hand
    /// input.  Returns false when the user asked to quit.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        if self.window.is_key_pressed(Key::Escape, KeyRepeat::No) {
            let _ = self.sim_tx.send(SimInput::Quit);
            return false;
        }

        let input = match self.window.get_mouse_pos(MouseMode::Discard) {
            Some((x, y)) => SimInput::Pointer {
                x,
                y,
                pinched: self.window.get_mouse_down(MouseButton::Left),
            },
            None => SimInput::PointerLeft,
        };
        let _ = self.sim_tx.send(input);

        true
    }

    /// Render one frame.
    pub fn render(&mut self, app: &AppState) -> Result<(), AppError> {
        self.buf.fill(BG_COLOR);

        // ── Buttons ───────────────────────────────────────────────────────
        let flashed = app.flash().map(|f| f.index);
        for (i, region) in app.layout().regions().iter().enumerate() {
            let fill = if flashed == Some(i) { PRESSED_FILL } else { BUTTON_FILL };
            let border = if app.hovered() == Some(i) { HOVER_BORDER } else { BUTTON_BORDER };
            self.draw_button(region, fill, border);
        }

        // ── Display strip ─────────────────────────────────────────────────
        self.draw_display(app.layout().display(), app.expression().text());

        // ── Hand ──────────────────────────────────────────────────────────
        if let Some(hand) = app.hand() {
            self.draw_skeleton(hand);
        }
        self.draw_pointer(app.pointer(), app.is_pressing());

        // ── Status bar ────────────────────────────────────────────────────
        let (w, h) = (self.width as i32, self.height as i32);
        self.fill_rect(0, h - STATUS_H, w, STATUS_H, STATUS_BG);
        self.draw_text(&app.status, 10, h - STATUS_H + 4, STATUS_SCALE, 0xFFEEEEEE);
        let legend = "mouse=point  left button=pinch  esc=quit";
        let lx = w - text_width(legend, STATUS_SCALE) - 10;
        self.draw_text(legend, lx, h - STATUS_H + 20, STATUS_SCALE, 0xFF888888);

        self.window
            .update_with_buffer(&self.buf, self.width, self.height)
            .map_err(|e| AppError::Window(e.to_string()))
    }

    // ── Calculator ────────────────────────────────────────────────────────

    fn draw_button(&mut self, region: &Region, fill: u32, border: u32) {
        let r = region.rect();
        // Hit-testing is inclusive of the far edge, so draw it too.
        self.fill_rect(r.x, r.y, r.width + 1, r.height + 1, fill);
        self.draw_border(r.x, r.y, r.width + 1, r.height + 1, BORDER_PX, border);

        let label = region.value();
        let lx = r.x + (r.width - text_width(label, LABEL_SCALE)) / 2;
        let ly = r.y + (r.height - 5 * LABEL_SCALE) / 2;
        self.draw_text(label, lx, ly, LABEL_SCALE, LABEL_COLOR);
    }

    fn draw_display(&mut self, r: Rect, text: &str) {
        self.fill_rect(r.x, r.y, r.width + 1, r.height + 1, BUTTON_FILL);
        self.draw_border(r.x, r.y, r.width + 1, r.height + 1, BORDER_PX, BUTTON_BORDER);

        // Long expressions keep their most recent characters visible.
        let pad = 10;
        let fit = ((r.width - 2 * pad) / (4 * DISPLAY_SCALE)).max(0) as usize;
        let count = text.chars().count();
        let shown: String = text.chars().skip(count.saturating_sub(fit)).collect();

        let ty = r.y + (r.height - 5 * DISPLAY_SCALE) / 2;
        self.draw_text(&shown, r.x + pad, ty, DISPLAY_SCALE, DISPLAY_TEXT);
    }

    // ── Hand ──────────────────────────────────────────────────────────────

    fn draw_skeleton(&mut self, hand: &Hand) {
        let (w, h) = (self.width as u32, self.height as u32);
        for &(a, b) in HAND_CONNECTIONS.iter() {
            if let (Some(la), Some(lb)) = (hand.get(a), hand.get(b)) {
                self.draw_line(to_pixel(la, w, h), to_pixel(lb, w, h), SKELETON_COLOR);
            }
        }
        for (_, lm) in hand.iter() {
            let p = to_pixel(lm, w, h);
            self.fill_circle(p.x, p.y, 4, SKELETON_COLOR);
        }
    }

    fn draw_pointer(&mut self, pointer: &Pointer, pressing: bool) {
        if let Some([a, b]) = pointer.tips {
            self.draw_line(a, b, MARKER_COLOR);
            self.fill_circle(a.x, a.y, MARKER_R, MARKER_COLOR);
            self.fill_circle(b.x, b.y, MARKER_R, MARKER_COLOR);
        }
        if let Some(p) = pointer.point {
            let color = if pressing { PINCH_COLOR } else { MARKER_COLOR };
            self.fill_circle(p.x, p.y, MARKER_R, color);
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.buf[y as usize * self.width + x as usize] = color;
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width as i32);
        let y1 = (y + h).min(self.height as i32);
        for row in y0..y1 {
            for col in x0..x1 {
                self.buf[row as usize * self.width + col as usize] = color;
            }
        }
    }

    fn draw_border(&mut self, x: i32, y: i32, w: i32, h: i32, thick: i32, color: u32) {
        self.fill_rect(x, y, w, thick, color);
        self.fill_rect(x, y + h - thick, w, thick, color);
        self.fill_rect(x, y, thick, h, color);
        self.fill_rect(x + w - thick, y, thick, h, color);
    }

    fn fill_circle(&mut self, cx: i32, cy: i32, r: i32, color: u32) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Bresenham line, three pixels thick.
    fn draw_line(&mut self, a: Point, b: Point, color: u32) {
        let (mut x, mut y) = (a.x, a.y);
        let dx = (b.x - a.x).abs();
        let dy = -(b.y - a.y).abs();
        let sx = if a.x < b.x { 1 } else { -1 };
        let sy = if a.y < b.y { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.fill_circle(x, y, 1, color);
            if x == b.x && y == b.y { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }

    /// Scaled 3×5 bitmap text.
    fn draw_text(&mut self, text: &str, x: i32, y: i32, scale: i32, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3i32 {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(cx + col * scale, y + row as i32 * scale, scale, scale, color);
                    }
                }
            }
            cx += 4 * scale; // 3 wide + 1 gap
            if cx >= self.width as i32 { break; }
        }
    }
}

/// Pixel width of `text` at `scale`, without the trailing gap.
fn text_width(text: &str, scale: i32) -> i32 {
    let n = text.chars().count() as i32;
    if n == 0 { 0 } else { n * 4 * scale - scale }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '*' => [0b000, 0b101, 0b010, 0b101, 0b000],
        '^' => [0b010, 0b101, 0b000, 0b000, 0b000],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
