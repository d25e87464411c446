use tera::escape_html;

/// Small builder for XML documents. Text and attribute values are always escaped,
/// only `raw` writes unescaped content and it is meant for fixed literals.
#[derive(Default)]
pub struct Markup {
    buf: String,
}

impl Markup {
    pub fn new() -> Markup {
        Markup { buf: String::new() }
    }

    /// Writes an opening tag with attributes quoted in single quotes
    pub fn open(&mut self, tag: &str, attrs: &[(&str, &str)]) -> &mut Self {
        self.buf.push('<');
        self.buf.push_str(tag);
        self.attributes(attrs);
        self.buf.push('>');
        self
    }

    pub fn close(&mut self, tag: &str) -> &mut Self {
        self.buf.push_str("</");
        self.buf.push_str(tag);
        self.buf.push('>');
        self
    }

    /// Writes a self closing tag
    pub fn empty(&mut self, tag: &str, attrs: &[(&str, &str)]) -> &mut Self {
        self.buf.push('<');
        self.buf.push_str(tag);
        self.attributes(attrs);
        self.buf.push_str("/>");
        self
    }

    pub fn text(&mut self, text: &str) -> &mut Self {
        self.buf.push_str(&escape_html(text));
        self
    }

    pub fn raw(&mut self, literal: &str) -> &mut Self {
        self.buf.push_str(literal);
        self
    }

    /// Writes an element holding only text
    pub fn element(&mut self, tag: &str, attrs: &[(&str, &str)], text: &str) -> &mut Self {
        self.open(tag, attrs).text(text).close(tag)
    }

    pub fn finish(self) -> String {
        self.buf
    }

    fn attributes(&mut self, attrs: &[(&str, &str)]) {
        for (name, value) in attrs {
            self.buf.push(' ');
            self.buf.push_str(name);
            self.buf.push_str("='");
            self.buf.push_str(&escape_html(value));
            self.buf.push('\'');
        }
    }
}
