#![deny(warnings)]

/// Buffered, backtrackable cursor over any iterator.
///
/// Items pulled from the source are kept in `buf` until `extract` or `ignore`
/// drops them, so callers can look ahead and rewind with `set_pos`.
pub struct Scanner<I: Iterator> where I::Item: Clone {
    src: I,
    buf: Vec<I::Item>,
    pos: isize,
}

impl<I> Iterator for Scanner<I> where I: Iterator, I::Item: Clone {
    type Item = I::Item;
    fn next(&mut self) -> Option<Self::Item> {
        self.pos += 1;
        self.fill_to_pos();
        self.pos = self.pos.min(self.buf.len() as isize);
        self.curr()
    }
}

impl<I> Scanner<I> where I: Iterator, I::Item: Clone {
    pub fn new(source: I) -> Scanner<I> {
        Scanner{src: source, buf: Vec::new(), pos: -1}
    }

    pub fn pos(&self) -> isize { self.pos }

    pub fn set_pos(&mut self, pos: isize) -> bool {
        if pos < -1 || pos > self.buf.len() as isize {
            return false;
        }
        self.pos = pos;
        true
    }

    pub fn curr(&self) -> Option<I::Item> {
        if self.pos < 0 {
            return None;
        }
        self.buf.get(self.pos as usize).cloned()
    }

    // pull from the source until the buffer covers self.pos
    fn fill_to_pos(&mut self) {
        while self.pos >= self.buf.len() as isize {
            match self.src.next() {
                Some(item) => self.buf.push(item),
                None => break,
            }
        }
    }

    pub fn peek(&mut self) -> Option<I::Item> {
        let backtrack = self.pos;
        let peeked = self.next();
        self.pos = backtrack;
        peeked
    }

    /// Items consumed since the last extract/ignore.
    fn view(&self) -> &[I::Item] {
        &self.buf[..(self.pos + 1) as usize]
    }

    /// Drop consumed items, the next call to `next` starts fresh.
    pub fn ignore(&mut self) {
        let consumed = (self.pos + 1) as usize;
        self.buf.drain(..consumed.min(self.buf.len()));
        self.pos = -1;
    }

    pub fn extract(&mut self) -> Vec<I::Item> {
        let items = self.view().to_vec();
        self.ignore();
        items
    }
}

impl<I: Iterator<Item=char>> Scanner<I> {
    pub fn accept_any_char(&mut self, any: &str) -> Option<char> {
        let backtrack = self.pos();
        match self.next() {
            Some(next) if any.contains(next) => Some(next),
            _ => {
                self.set_pos(backtrack);
                None
            }
        }
    }

    pub fn skip_all_chars(&mut self, over: &str) -> bool {
        let mut advanced = false;
        while self.accept_any_char(over).is_some() { advanced = true; }
        advanced
    }

    pub fn extract_string(&mut self) -> String {
        self.extract().into_iter().collect()
    }

    /// Skip whitespace and forget it.
    pub fn ignore_ws(&mut self) {
        self.skip_all_chars(" \t\r\n");
        self.ignore();
    }
}

impl<'a> Scanner<std::str::Chars<'a>> {
    pub fn from_str(source: &'a str) -> Self {
        Scanner::new(source.chars())
    }
}
