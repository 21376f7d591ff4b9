use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};
use std::io::{self, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    fn term(self) -> CColor {
        CColor::Rgb {
            r: self.0,
            g: self.1,
            b: self.2,
        }
    }
}

/// Axis-aligned pixel rectangle. Edges are half-open, so rectangles that
/// only touch do not overlap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }
}

/// The drawing capabilities the game needs from its host.
pub trait Surface {
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb);
    fn draw_string(&mut self, text: &str, x: i32, y: i32);
}

// ── Pixel buffer with half-block rendering ──────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label {
    pub text: String,
    pub x: i32,
    pub y: i32,
}

pub struct PixelBuf {
    w: usize,
    h: usize,
    px: Vec<Rgb>,
    labels: Vec<Label>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![Rgb::BLACK; w * h],
            labels: Vec::new(),
        }
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Smallest integer downsampling factor that fits the buffer into a
    /// terminal of `cols` x `rows` half-block cells.
    pub fn fit_scale(&self, cols: u16, rows: u16) -> usize {
        let cols = (cols as usize).max(1);
        let px_rows = (rows as usize).max(1) * 2;
        self.w.div_ceil(cols).max(self.h.div_ceil(px_rows)).max(1)
    }

    /// Present the buffer, sampling every `scale`-th pixel.
    pub fn render(&self, out: &mut impl Write, scale: usize) -> io::Result<()> {
        let scale = scale.max(1);
        let cols = self.w / scale;
        let rows = self.h / scale / 2;
        let sample = |col: usize, py: usize| self.get(col * scale, (py * scale).min(self.h - 1));

        queue!(out, cursor::MoveTo(0, 0))?;
        let mut prev_fg = Rgb(0, 0, 0);
        let mut prev_bg = Rgb(0, 0, 0);
        let mut need_fg = true;
        let mut need_bg = true;

        for row in 0..rows {
            for col in 0..cols {
                let top = sample(col, row * 2);
                let bot = sample(col, row * 2 + 1);

                if top == bot {
                    if need_bg || prev_bg != top {
                        queue!(out, style::SetBackgroundColor(top.term()))?;
                        prev_bg = top;
                        need_bg = false;
                    }
                    queue!(out, style::Print(' '))?;
                } else {
                    if need_fg || prev_fg != top {
                        queue!(out, style::SetForegroundColor(top.term()))?;
                        prev_fg = top;
                        need_fg = false;
                    }
                    if need_bg || prev_bg != bot {
                        queue!(out, style::SetBackgroundColor(bot.term()))?;
                        prev_bg = bot;
                        need_bg = false;
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                need_fg = true;
                need_bg = true;
            }
        }

        for label in &self.labels {
            let col = (label.x.max(0) as usize / scale) as u16;
            let row = (label.y.max(0) as usize / scale / 2) as u16;
            queue!(
                out,
                cursor::MoveTo(col, row),
                style::SetForegroundColor(Rgb::BLACK.term()),
                style::SetBackgroundColor(Rgb::WHITE.term()),
                style::Print(&label.text),
            )?;
        }

        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

impl Surface for PixelBuf {
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        // a fill over a label's origin paints it out
        self.labels
            .retain(|l| !Rect::new(x, y, w, h).overlaps(&Rect::new(l.x, l.y, 1, 1)));
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    fn draw_string(&mut self, text: &str, x: i32, y: i32) {
        self.labels.push(Label {
            text: text.to_string(),
            x,
            y,
        });
    }
}
