//! [`ResolveContext`] implemented over a live [`CompileTask`] — the one
//! place providers plug `jls_resolve::Scope` into the rest of the
//! workspace's source set (spec.md §4.3).

use jls_classpath::Universe;
use jls_db::CompileTask;
use jls_resolve::ResolveContext;

pub struct TaskResolveContext<'a> {
    pub task: &'a CompileTask,
}

impl<'a> ResolveContext for TaskResolveContext<'a> {
    fn classpath(&self) -> &Universe {
        self.task.universe()
    }

    fn source_classes_in_package(&self, package: &str) -> Vec<String> {
        let mut out = Vec::new();
        for file in self.task.file_ids() {
            let tree = self.task.item_tree_checked(file);
            if tree.package.as_deref().unwrap_or("") != package {
                continue;
            }
            for class in &tree.classes {
                out.push(qualify(package, &class.name));
            }
        }
        out
    }
}

fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{package}.{name}")
    }
}
