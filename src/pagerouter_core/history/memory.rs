/// 宿主环境的导航机制（浏览器 history、webview、测试用内存栈）。
///
/// 路由器只通过这个 trait 写入地址；宿主侧的前进 / 后退事件由宿主
/// 转交给 `RouterHandle::on_pop_state`。
pub trait History {
    /// 当前 href。
    fn location(&self) -> &str;

    /// 新增一条记录，并丢弃当前位置之后的记录。
    fn push(&mut self, href: &str);

    /// 替换当前记录。
    fn replace(&mut self, href: &str);

    /// 在记录间移动 `delta` 步；越界时返回 None 且位置不变。
    fn go(&mut self, delta: i32) -> Option<String>;
}

/// 基于内存的 History 实现，用于非浏览器宿主与测试。
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<String>,
    cursor: usize,
}

impl MemoryHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            cursor: 0,
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn position(&self) -> usize {
        self.cursor
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl History for MemoryHistory {
    fn location(&self) -> &str {
        &self.entries[self.cursor]
    }

    fn push(&mut self, href: &str) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(href.to_string());
        self.cursor = self.entries.len() - 1;
    }

    fn replace(&mut self, href: &str) {
        self.entries[self.cursor] = href.to_string();
    }

    fn go(&mut self, delta: i32) -> Option<String> {
        let target = self.cursor as i64 + i64::from(delta);
        if target < 0 || target >= self.entries.len() as i64 {
            return None;
        }
        self.cursor = target as usize;
        Some(self.entries[self.cursor].clone())
    }
}
