mod tests_mixin_injections;
mod tests_mixin_shadow;
