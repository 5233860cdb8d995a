/// 已知题目分类
///
/// 分类本身是自由文本，这里只负责输入提示
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySet {
    names: Vec<String>,
}

impl CategorySet {
    /// 去重（忽略大小写）并保留首次出现的顺序
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        for name in names {
            set.insert(name);
        }
        set
    }

    /// 加入一个分类，空白或重复的会被忽略
    pub fn insert(&mut self, name: impl Into<String>) {
        let name = name.into().trim().to_string();
        if name.is_empty() || self.contains(&name) {
            return;
        }
        self.names.push(name);
    }

    pub fn contains(&self, name: &str) -> bool {
        let name = name.trim();
        self.names.iter().any(|n| n.eq_ignore_ascii_case(name))
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// 输入提示
    ///
    /// 先返回前缀匹配，再返回包含匹配；空输入返回全部
    pub fn suggest(&self, input: &str) -> Vec<&str> {
        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return self.names.iter().map(String::as_str).collect();
        }

        let (prefix, rest): (Vec<&String>, Vec<&String>) = self
            .names
            .iter()
            .filter(|n| n.to_lowercase().contains(&needle))
            .partition(|n| n.to_lowercase().starts_with(&needle));

        prefix
            .into_iter()
            .chain(rest)
            .map(String::as_str)
            .collect()
    }
}
