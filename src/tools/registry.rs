use std::collections::HashSet;

use super::descriptor::ToolDescriptor;

/// 按名称去重的有序工具集合，同名时先到者保留
#[derive(Clone, Debug, Default)]
pub struct ToolSet {
    tools: Vec<ToolDescriptor>,
    names: HashSet<String>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            names: HashSet::new(),
        }
    }

    /// 名称已存在时丢弃并返回 false
    pub fn insert(&mut self, tool: ToolDescriptor) -> bool {
        if !self.names.insert(tool.name.clone()) {
            return false;
        }
        self.tools.push(tool);
        true
    }

    /// 同名时原位置替换为新定义，返回是否替换了旧定义
    pub fn upsert(&mut self, tool: ToolDescriptor) -> bool {
        if let Some(index) = self.tools.iter().position(|t| t.name == tool.name) {
            self.tools[index] = tool;
            return true;
        }
        self.names.insert(tool.name.clone());
        self.tools.push(tool);
        false
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|tool| tool.name == name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|tool| tool.name.as_str())
    }

    pub fn into_vec(self) -> Vec<ToolDescriptor> {
        self.tools
    }
}

impl FromIterator<ToolDescriptor> for ToolSet {
    fn from_iter<I: IntoIterator<Item = ToolDescriptor>>(iter: I) -> Self {
        let mut set = ToolSet::new();
        set.extend(iter);
        set
    }
}

impl Extend<ToolDescriptor> for ToolSet {
    fn extend<I: IntoIterator<Item = ToolDescriptor>>(&mut self, iter: I) {
        for tool in iter {
            self.insert(tool);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool(name: &str, description: &str) -> ToolDescriptor {
        ToolDescriptor::builder("custom", name)
            .description(description)
            .build()
    }

    #[test]
    fn first_occurrence_wins() {
        let mut set = ToolSet::new();
        assert!(set.insert(tool("a", "first")));
        assert!(!set.insert(tool("a", "second")));
        assert!(set.insert(tool("b", "other")));
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("a").unwrap().description.as_deref(), Some("first"));
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut set: ToolSet = vec![tool("a", "old"), tool("b", "other")].into_iter().collect();
        assert!(set.upsert(tool("a", "new")));
        assert!(!set.upsert(tool("c", "added")));
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(set.get("a").unwrap().description.as_deref(), Some("new"));
    }
}
