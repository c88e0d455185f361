//! Rewrite cases for single sources
//!
//! Run with: cargo test --test fixes_tests

use double_indent::fix_src;
use pretty_assertions::assert_eq;

fn assert_noop(name: &str, src: &str) {
    let result = fix_src(src, 4).unwrap_or_else(|e| panic!("{}: {}", name, e));
    assert_eq!(result.code, src, "{}", name);
    assert!(!result.changed, "{}", name);
}

fn assert_fixes(name: &str, src: &str, expected: &str) {
    let result = fix_src(src, 4).unwrap_or_else(|e| panic!("{}: {}", name, e));
    assert_eq!(result.code, expected, "{}", name);
    assert!(result.changed, "{}", name);
}

#[test]
fn test_noop() {
    let cases = [
        ("one line def", "def f(a, b): pass\n"),
        ("args on one line", "def f(\n    a, b,\n): pass\n"),
        ("one line def type annotations", "def f(a, b) -> bool: pass\n"),
        ("correct indentation", "def f(  \n        a,\n        b,\n):pass\n"),
        (
            "correct indentation with defaults",
            "def f(\n        a,\n        b = 69,\n): pass\n",
        ),
        ("one line method def", "class x:\n    def foo(self): pass\n"),
        (
            "correct def type annotations",
            "def f(\n        a: int,\n        b: str,\n) -> bool:\n    pass\n",
        ),
        (
            "correct kwarg only",
            "def f(\n        a,\n        *,\n        b,\n):\n    pass\n",
        ),
        (
            "correct kwarg only as first arg",
            "def f(\n        *,\n        a,\n        b,\n):\n    pass\n",
        ),
        (
            "correct positional only",
            "def f(\n        a,\n        /,\n        b,\n):\n    pass\n",
        ),
        (
            "correct nested function def",
            "def f(\n        x,\n        y,\n):\n    def ff(\n            y,\n    ): pass\n",
        ),
        ("function without args", "def f():\n    pass\n"),
        ("empty multiline parens", "def f(\n):\n    pass\n"),
        (
            "function with multiline default",
            "def f(\n        x=y(\n            foo=bar,\n        ),\n        z=1,\n): pass\n",
        ),
        (
            "function with multiline default, kwonly",
            "def f(\n        x=y(\n            foo=bar,\n        ),\n        *,\n        z=1,\n): pass\n",
        ),
        (
            "function with multiline default, posonly",
            "def f(\n        x=y(\n            foo=bar,\n        ),\n        /,\n        z=1,\n): pass\n",
        ),
        (
            "function has multiline type annotation",
            "def f(\n        a: str,\n        b: dict[\n            str, \n            str, \n        ]\n,): pass\n",
        ),
        (
            "blank line between parameters",
            "def f(\n        a,\n\n        b,\n):\n    pass\n",
        ),
        (
            "multiline string default",
            "def f(\n        a='''x\n  y''',\n        b=1,\n):\n    pass\n",
        ),
        (
            "call with multiline arguments",
            "f(\n    a,\n    b,\n)\n",
        ),
    ];

    for (name, src) in cases {
        assert_noop(name, src);
    }
}

#[test]
fn test_fixes() {
    let cases = [
        (
            "incorrect indent",
            "def f(\n    a,\n    b,\n):\n    pass\n",
            "def f(\n        a,\n        b,\n):\n    pass\n",
        ),
        (
            "incorrect indent with type annotations",
            "def f(\n    a: str,\n    b: tuple[int, int],\n) -> bool:\n    pass\n",
            "def f(\n        a: str,\n        b: tuple[int, int],\n) -> bool:\n    pass\n",
        ),
        (
            "incorrect indent default call",
            "def f(\n    a,\n    b = call(some),\n):\n    pass\n",
            "def f(\n        a,\n        b = call(some),\n):\n    pass\n",
        ),
        (
            "no existing indentation",
            "def f(\na,\nb,\n):\n    pass\n",
            "def f(\n        a,\n        b,\n):\n    pass\n",
        ),
        (
            "incorrect kwarg only",
            "def f(\n    a,\n    *,\n    b,\n):\n    pass\n",
            "def f(\n        a,\n        *,\n        b,\n):\n    pass\n",
        ),
        (
            "incorrect kwarg only **kwargs",
            "def f(\n    a,\n    *,\n    b,\n    **kwargs,):\n    pass\n",
            "def f(\n        a,\n        *,\n        b,\n        **kwargs,):\n    pass\n",
        ),
        (
            "incorrect *args",
            "def f(\n    a,\n    b,\n    *args,):\n    pass\n",
            "def f(\n        a,\n        b,\n        *args,):\n    pass\n",
        ),
        (
            "only *args",
            "def f(\n    *args\n):\n    pass\n",
            "def f(\n        *args\n):\n    pass\n",
        ),
        (
            "incorrect class method def",
            "class C:\n    def f(\n       self,\n       y,\n    ):\n        pass\n",
            "class C:\n    def f(\n            self,\n            y,\n    ):\n        pass\n",
        ),
        (
            "comment in function definition",
            "def f(\n    a,\n    #  comment,\n    b,\n):\n    pass\n",
            "def f(\n        a,\n        #  comment,\n        b,\n):\n    pass\n",
        ),
        (
            "nested function def",
            "def f(\n    x,\n    y,\n):\n    def ff(\n        y,\n    ): pass\n",
            "def f(\n        x,\n        y,\n):\n    def ff(\n            y,\n    ): pass\n",
        ),
        (
            "nested async function def",
            "async def f(\n    x,\n    y,\n):\n    async def ff(\n        y,\n    ): pass\n",
            "async def f(\n        x,\n        y,\n):\n    async def ff(\n            y,\n    ): pass\n",
        ),
        (
            "async function def",
            "async def f(\n    a,\n    b,\n):\n    pass\n",
            "async def f(\n        a,\n        b,\n):\n    pass\n",
        ),
        (
            "function with multiline default",
            "def f(\n    x=y(\n        foo=bar,\n    ),\n    z=1,\n): pass\n",
            "def f(\n        x=y(\n            foo=bar,\n        ),\n        z=1,\n): pass\n",
        ),
        (
            "function with multiline default last arg",
            "def f(\n    z=1,\n    x=y(\n        foo=bar,\n    ),\n): pass\n",
            "def f(\n        z=1,\n        x=y(\n            foo=bar,\n        ),\n): pass\n",
        ),
        (
            "function with multiline type annotation",
            "def f(\n    a: str,\n    b: dict[\n        str, \n        str, \n    ]\n,): pass\n",
            "def f(\n        a: str,\n        b: dict[\n            str, \n            str, \n        ]\n,): pass\n",
        ),
        (
            "function with multiline default, kwonlyargs",
            "def f(\n    z=1,\n    *\n,    x=y(\n        foo=bar,\n    ),\n): pass\n",
            "def f(\n        z=1,\n        *\n,        x=y(\n            foo=bar,\n        ),\n): pass\n",
        ),
        (
            "function with multiline default, posonly",
            "def f(\n    z=1,\n    /\n,    x=y(\n        foo=bar,\n    ),\n): pass\n",
            "def f(\n        z=1,\n        /\n,        x=y(\n            foo=bar,\n        ),\n): pass\n",
        ),
        (
            "over indented",
            "def f(\n            a,\n            b,\n):\n    pass\n",
            "def f(\n        a,\n        b,\n):\n    pass\n",
        ),
        (
            "decorated method",
            "class C:\n    @property\n    def f(\n        self,\n    ):\n        pass\n",
            "class C:\n    @property\n    def f(\n            self,\n    ):\n        pass\n",
        ),
        (
            "type parameters",
            "def f[T](\n    a: T,\n) -> T:\n    return a\n",
            "def f[T](\n        a: T,\n) -> T:\n    return a\n",
        ),
        (
            "crlf line endings",
            "def f(\r\n    a,\r\n):\r\n    pass\r\n",
            "def f(\r\n        a,\r\n):\r\n    pass\r\n",
        ),
    ];

    for (name, src, expected) in cases {
        assert_fixes(name, src, expected);
    }
}

#[test]
fn test_custom_indent() {
    let src = "def f(\n  a,\n  b,\n):\n  pass\n";
    let result = fix_src(src, 2).unwrap();
    assert_eq!(result.code, "def f(\n    a,\n    b,\n):\n  pass\n");

    let result = fix_src(src, 3).unwrap();
    assert_eq!(result.code, "def f(\n      a,\n      b,\n):\n  pass\n");
}

#[test]
fn test_idempotent_on_fixed_output() {
    let src = "class C:\n    def f(\n    x=y(\n        1,\n    ),\n    *args,\n    ):\n        pass\n";
    let once = fix_src(src, 4).unwrap();
    let twice = fix_src(&once.code, 4).unwrap();
    assert_eq!(twice.code, once.code);
    assert!(!twice.changed);
}
