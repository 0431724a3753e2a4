use crate::{
    storage::bplus_tree::BPlusTree,
    types::{
        COMMON_NODE_HEADER_SIZE, LEAF_NODE_CELL_SIZE, LEAF_NODE_HEADER_SIZE, LEAF_NODE_MAX_CELLS,
        LEAF_NODE_SPACE_FOR_CELLS, PageNum, ROW_SIZE, error::DatabaseError, page::NodeType,
    },
};

/// Output of `.constants`: the layout sizes the file format is built from.
pub fn constants() -> Vec<String> {
    vec![
        "Constants:".to_string(),
        format!("ROW_SIZE: {}", ROW_SIZE),
        format!("COMMON_NODE_HEADER_SIZE: {}", COMMON_NODE_HEADER_SIZE),
        format!("LEAF_NODE_HEADER_SIZE: {}", LEAF_NODE_HEADER_SIZE),
        format!("LEAF_NODE_CELL_SIZE: {}", LEAF_NODE_CELL_SIZE),
        format!("LEAF_NODE_SPACE_FOR_CELLS: {}", LEAF_NODE_SPACE_FOR_CELLS),
        format!("LEAF_NODE_MAX_CELLS: {}", LEAF_NODE_MAX_CELLS),
    ]
}

/// Output of `.btree`: the whole tree, starting at the root.
pub fn render_tree(tree: &mut BPlusTree) -> Result<Vec<String>, DatabaseError> {
    let mut lines = vec!["Tree:".to_string()];
    let root = tree.root_page_num();
    print_tree(tree, root, 0, &mut lines)?;
    Ok(lines)
}

fn indent(level: usize) -> String {
    "  ".repeat(level)
}

pub fn print_tree(
    tree: &mut BPlusTree,
    page_num: PageNum,
    level: usize,
    lines: &mut Vec<String>,
) -> Result<(), DatabaseError> {
    if level > tree.pager().num_pages() as usize {
        return Err(DatabaseError::CorruptedPage {
            page_num,
            reason: "Tree is deeper than the number of pages".to_string(),
        });
    }

    let node = tree.node(page_num)?;
    match node.node_type()? {
        NodeType::Leaf => {
            let num_cells = node.leaf_num_cells() as usize;
            lines.push(format!("{}- leaf (size {})", indent(level), num_cells));
            for i in 0..num_cells {
                lines.push(format!("{}- {}", indent(level + 1), node.leaf_key(i)));
            }
        }
        NodeType::Internal => {
            let entries = node.internal_entries();
            lines.push(format!("{}- internal (size {})", indent(level), entries.len()));
            for (i, &(_, key)) in entries.iter().enumerate() {
                let child = tree.child(page_num, i)?;
                print_tree(tree, child, level + 1, lines)?;
                lines.push(format!("{}- key {}", indent(level + 1), key));
            }
            let right_child = tree.child(page_num, entries.len())?;
            print_tree(tree, right_child, level + 1, lines)?;
        }
    }
    Ok(())
}
