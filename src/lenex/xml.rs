// ==========================================
// 游泳赛事报名转换系统 - 通用 XML 节点树
// ==========================================
// 工具: quick-xml (事件流读取 / 带缩进写出)
// 职责: 保留未识别的属性与子元素，保证读写往返不丢数据
// ==========================================

use crate::lenex::error::{LenexError, LenexResult};
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesDecl, BytesEnd, BytesRef, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlNode {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
    pub text: String,
}

impl XmlNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// 设置属性（已存在则覆盖原值，位置不变）
    pub fn set_attr(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((key.to_string(), value)),
        }
    }

    pub fn take_attr(&mut self, key: &str) -> Option<String> {
        let pos = self.attrs.iter().position(|(k, _)| k == key)?;
        Some(self.attrs.remove(pos).1)
    }

    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// 取出第一个同名子元素
    pub fn take_child(&mut self, name: &str) -> Option<XmlNode> {
        let pos = self.children.iter().position(|c| c.name == name)?;
        Some(self.children.remove(pos))
    }

    /// 取出全部同名子元素（保持顺序）
    pub fn take_children(&mut self, name: &str) -> Vec<XmlNode> {
        let (taken, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.children)
            .into_iter()
            .partition(|c| c.name == name);
        self.children = rest;
        taken
    }

    fn from_start(start: &BytesStart<'_>) -> LenexResult<Self> {
        let mut node = XmlNode::new(String::from_utf8_lossy(start.name().as_ref()).to_string());
        for attr in start.attributes() {
            let attr = attr.map_err(|e| LenexError::Xml(e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let raw = String::from_utf8_lossy(&attr.value).to_string();
            let value = unescape(&raw)?.into_owned();
            node.attrs.push((key, value));
        }
        Ok(node)
    }
}

// ==========================================
// 读取
// ==========================================

/// 解析完整 XML 文档，返回根元素
pub fn parse_document(xml: &str) -> LenexResult<XmlNode> {
    // 文本在实体引用处被拆成多段，拼接完整后于结束标签处统一修剪
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => stack.push(XmlNode::from_start(e)?),
            Event::Empty(ref e) => {
                let node = XmlNode::from_start(e)?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::End(_) => {
                let mut node = stack
                    .pop()
                    .ok_or_else(|| LenexError::Structure("多余的结束标签".to_string()))?;
                finish_text(&mut node);
                attach(&mut stack, &mut root, node)?;
            }
            Event::Text(ref e) => {
                if let Some(top) = stack.last_mut() {
                    let raw = String::from_utf8_lossy(e.as_ref()).to_string();
                    top.text.push_str(&unescape(&raw)?);
                }
            }
            Event::GeneralRef(ref e) => {
                if let Some(top) = stack.last_mut() {
                    push_reference(&mut top.text, e)?;
                }
            }
            Event::CData(e) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::Eof => break,
            // 声明/注释/处理指令不参与模型
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(LenexError::Structure("存在未闭合的元素".to_string()));
    }
    root.ok_or_else(|| LenexError::Structure("文档为空".to_string()))
}

/// 文本中的实体引用: 预定义实体与字符引用，其余忽略
fn push_reference(text: &mut String, reference: &BytesRef<'_>) -> LenexResult<()> {
    if let Some(ch) = reference
        .resolve_char_ref()
        .map_err(|e| LenexError::Xml(e.to_string()))?
    {
        text.push(ch);
        return Ok(());
    }
    let name = reference
        .decode()
        .map_err(|e| LenexError::Xml(e.to_string()))?;
    if let Some(value) = resolve_predefined_entity(&name) {
        text.push_str(value);
    }
    Ok(())
}

/// 纯空白文本视为缩进，其余去掉首尾空白
fn finish_text(node: &mut XmlNode) {
    let trimmed = node.text.trim();
    if trimmed.len() != node.text.len() {
        node.text = trimmed.to_string();
    }
}

fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) -> LenexResult<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(node);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(node);
            Ok(())
        }
        None => Err(LenexError::Structure("存在多个根元素".to_string())),
    }
}

// ==========================================
// 写出
// ==========================================

/// 写出带 XML 声明的完整文档（两空格缩进）
pub fn write_document(root: &XmlNode) -> LenexResult<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_node(&mut writer, root)?;
    Ok(writer.into_inner())
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &XmlNode) -> LenexResult<()> {
    let mut start = BytesStart::new(node.name.as_str());
    for (key, value) in &node.attrs {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if node.children.is_empty() && node.text.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if !node.text.is_empty() {
        writer.write_event(Event::Text(BytesText::new(&node.text)))?;
    }
    for child in &node.children {
        write_node(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(node.name.as_str())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_with_attributes() {
        let xml = r#"<?xml version="1.0"?>
            <ROOT a="1"><CHILD b="x &amp; y"/><CHILD b="2">text</CHILD></ROOT>"#;
        let root = parse_document(xml).unwrap();
        assert_eq!(root.name, "ROOT");
        assert_eq!(root.attr("a"), Some("1"));
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].attr("b"), Some("x & y"));
        assert_eq!(root.children[1].text, "text");
    }

    #[test]
    fn test_write_then_parse_keeps_structure() {
        let mut root = XmlNode::new("ROOT");
        root.set_attr("name", "Кубок <города>");
        let mut child = XmlNode::new("ITEM");
        child.set_attr("id", "7");
        root.children.push(child);

        let bytes = write_document(&root).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("<?xml"));

        let parsed = parse_document(&text).unwrap();
        assert_eq!(parsed, root);
    }

    #[test]
    fn test_text_around_entity_keeps_spaces() {
        let root = parse_document("<A>\n  <B>Smith &amp; Sons</B>\n</A>").unwrap();
        assert!(root.text.is_empty());
        assert_eq!(root.children[0].text, "Smith & Sons");

        let bytes = write_document(&root).unwrap();
        let parsed = parse_document(&String::from_utf8(bytes).unwrap()).unwrap();
        assert_eq!(parsed, root);
        assert_eq!(parsed.children[0].text, "Smith & Sons");
    }

    #[test]
    fn test_padded_text_trimmed_once() {
        let root = parse_document("<A><B>  x &lt; y &#65;  </B></A>").unwrap();
        assert_eq!(root.children[0].text, "x < y A");
    }

    #[test]
    fn test_take_children_keeps_rest() {
        let mut root = XmlNode::new("R");
        root.children.push(XmlNode::new("A"));
        root.children.push(XmlNode::new("B"));
        root.children.push(XmlNode::new("A"));

        let taken = root.take_children("A");
        assert_eq!(taken.len(), 2);
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].name, "B");
    }

    #[test]
    fn test_unclosed_document_fails() {
        assert!(parse_document("<ROOT><A>").is_err());
    }
}
