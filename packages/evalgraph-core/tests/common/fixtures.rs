//! Java test fixtures

use evalgraph_core::{Cursor, NodeKind, Parser, SyntaxTree, TreeSitterParser};

/// Method `m` with the fragment between `a();` and `b();`
pub const METHOD_TEMPLATE: &str = "\
class A {
    void a();
    void b();
    void m(String u, String v) {
        a();
        __FRAGMENT__
        b();
    }
}
";

pub fn parse(source: &str) -> SyntaxTree {
    let tree = TreeSitterParser::java()
        .parse(source, "A.java")
        .unwrap_or_else(|e| panic!("failed to parse fixture: {e}"));
    assert!(
        !tree.has_errors(),
        "fixture has syntax errors: {:?}\n{source}",
        tree.errors()
    );
    tree
}

/// Parse `fragment` placed inside `METHOD_TEMPLATE`
pub fn parse_fragment(fragment: &str) -> SyntaxTree {
    parse(&METHOD_TEMPLATE.replace("__FRAGMENT__", fragment))
}

/// Cursor of the method declaration called `name`
pub fn method(tree: &SyntaxTree, name: &str) -> Cursor {
    tree.post_order()
        .into_iter()
        .filter_map(|id| tree.cursor(id).ok())
        .find(|&c| {
            matches!(
                tree.kind(c),
                Ok(NodeKind::MethodDeclaration { name: n, .. }) if n == name
            )
        })
        .unwrap_or_else(|| panic!("no method `{name}`"))
}

/// Straight-line class used by the law tests: no dead code, one of each
/// construct
pub fn law_fixture() -> String {
    r#"
class Laws {
    int f;

    int g(int p, int q) {
        int x = p + q;
        int[] arr = new int[] { x, p };
        arr[x] = q;
        this.f = x * 2;
        h(x, p, q);
        if (x > 0) {
            x = x - 1;
        } else {
            x++;
        }
        while (x < 10) {
            if (q == 0) continue;
            x += q;
        }
        for (int i = 0; i < x; i++) {
            h(i);
        }
        for (int e : arr) {
            q = q + e;
        }
        switch (x) {
            case 1:
                h(1);
            case 2:
                h(2);
                break;
            default:
                h(3);
        }
        try {
            h(x);
        } catch (RuntimeException ex) {
            h(0);
        } finally {
            h(-1);
        }
        boolean ok = p > 0 && q > 0;
        Runnable r = () -> h(p);
        return ok ? x : q;
    }

    void h(int... xs) {}
}
"#
    .to_string()
}
